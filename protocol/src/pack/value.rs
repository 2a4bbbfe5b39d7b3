//! The [`Value`] enum: one self-describing typed value.
//!
//! On the wire a value is a one-byte kind tag followed by its payload. Scalar
//! payloads are fixed-width big-endian; strings and byte vectors are
//! length-prefixed; structs and lists nest.

use serde::{Deserialize, Serialize};

use super::Typed;
use crate::codec::primitives::{
    decode_bool, decode_bytes, decode_len, decode_string, decode_u16, decode_u32, decode_u64,
    decode_u8, encode_bool, encode_bytes, encode_len, encode_str, encode_u16, encode_u32,
    encode_u64, encode_u8, read_raw, write_raw,
};
use crate::codec::{CodecError, Decode, Encode};
use crate::config::{
    size_hint_bytes, LENGTH_PREFIX_SIZE, MAX_PREALLOC_ITEMS, MAX_TYPED_DEPTH, SIZE_HINT_BOOL,
    SIZE_HINT_U16, SIZE_HINT_U32, SIZE_HINT_U64, SIZE_HINT_U8,
};

// ---------------------------------------------------------------------------
// Kind tags
// ---------------------------------------------------------------------------

const KIND_BOOL: u8 = 0x01;
const KIND_U8: u8 = 0x02;
const KIND_U16: u8 = 0x03;
const KIND_U32: u8 = 0x04;
const KIND_U64: u8 = 0x05;
const KIND_U256: u8 = 0x06;
const KIND_STRING: u8 = 0x07;
const KIND_BYTES: u8 = 0x08;
const KIND_BYTES32: u8 = 0x09;
const KIND_STRUCT: u8 = 0x0A;
const KIND_LIST: u8 = 0x0B;

/// Smallest possible encoded value: a kind tag plus a one-byte payload.
pub(crate) const MIN_VALUE_SIZE: usize = SIZE_HINT_U8 + SIZE_HINT_U8;

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A single typed value.
///
/// `U256` holds a 256-bit unsigned integer as 32 big-endian bytes; the
/// codec never does arithmetic on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U256(#[serde(with = "crate::serde_hex::fixed")] [u8; 32]),
    String(String),
    Bytes(#[serde(with = "crate::serde_hex::bytes")] Vec<u8>),
    Bytes32(#[serde(with = "crate::serde_hex::fixed")] [u8; 32]),
    Struct(Typed),
    List(Vec<Value>),
}

impl Value {
    /// The wire tag for this value's kind.
    pub fn kind(&self) -> u8 {
        match self {
            Self::Bool(_) => KIND_BOOL,
            Self::U8(_) => KIND_U8,
            Self::U16(_) => KIND_U16,
            Self::U32(_) => KIND_U32,
            Self::U64(_) => KIND_U64,
            Self::U256(_) => KIND_U256,
            Self::String(_) => KIND_STRING,
            Self::Bytes(_) => KIND_BYTES,
            Self::Bytes32(_) => KIND_BYTES32,
            Self::Struct(_) => KIND_STRUCT,
            Self::List(_) => KIND_LIST,
        }
    }

    fn payload_size_hint(&self) -> usize {
        match self {
            Self::Bool(_) => SIZE_HINT_BOOL,
            Self::U8(_) => SIZE_HINT_U8,
            Self::U16(_) => SIZE_HINT_U16,
            Self::U32(_) => SIZE_HINT_U32,
            Self::U64(_) => SIZE_HINT_U64,
            Self::U256(_) | Self::Bytes32(_) => 32,
            Self::String(s) => size_hint_bytes(s.len()),
            Self::Bytes(b) => size_hint_bytes(b.len()),
            Self::Struct(t) => t.size_hint(),
            Self::List(items) => {
                LENGTH_PREFIX_SIZE + items.iter().map(Encode::size_hint).sum::<usize>()
            }
        }
    }

    /// Decodes a value nested `depth` levels inside the outermost `Typed`.
    pub(crate) fn decode_at_depth(
        buf: &[u8],
        rem: usize,
        depth: usize,
    ) -> Result<(Self, &[u8], usize), CodecError> {
        if depth > MAX_TYPED_DEPTH {
            return Err(CodecError::DepthExceeded {
                max: MAX_TYPED_DEPTH,
            });
        }
        let (kind, buf, rem) = decode_u8(buf, rem)?;
        match kind {
            KIND_BOOL => decode_bool(buf, rem).map(|(v, b, r)| (Self::Bool(v), b, r)),
            KIND_U8 => decode_u8(buf, rem).map(|(v, b, r)| (Self::U8(v), b, r)),
            KIND_U16 => decode_u16(buf, rem).map(|(v, b, r)| (Self::U16(v), b, r)),
            KIND_U32 => decode_u32(buf, rem).map(|(v, b, r)| (Self::U32(v), b, r)),
            KIND_U64 => decode_u64(buf, rem).map(|(v, b, r)| (Self::U64(v), b, r)),
            KIND_U256 => decode_fixed32(buf, rem).map(|(v, b, r)| (Self::U256(v), b, r)),
            KIND_STRING => decode_string(buf, rem).map(|(v, b, r)| (Self::String(v), b, r)),
            KIND_BYTES => decode_bytes(buf, rem).map(|(v, b, r)| (Self::Bytes(v), b, r)),
            KIND_BYTES32 => decode_fixed32(buf, rem).map(|(v, b, r)| (Self::Bytes32(v), b, r)),
            KIND_STRUCT => Typed::decode_at_depth(buf, rem, depth + 1)
                .map(|(v, b, r)| (Self::Struct(v), b, r)),
            KIND_LIST => decode_list(buf, rem, depth + 1),
            other => Err(CodecError::UnknownKind(other)),
        }
    }
}

fn decode_fixed32(buf: &[u8], rem: usize) -> Result<([u8; 32], &[u8], usize), CodecError> {
    let (head, tail, rem) = read_raw(32, buf, rem)?;
    let mut out = [0u8; 32];
    out.copy_from_slice(head);
    Ok((out, tail, rem))
}

/// Capacity to reserve for `count` claimed elements of at least `min_size`
/// wire bytes each. Capped by the bytes actually left in `buf` and by
/// [`MAX_PREALLOC_ITEMS`], never by the claim or the quota alone.
pub(crate) fn prealloc_len(count: usize, buf: &[u8], min_size: usize) -> usize {
    count.min(buf.len() / min_size).min(MAX_PREALLOC_ITEMS)
}

fn decode_list(buf: &[u8], rem: usize, depth: usize) -> Result<(Value, &[u8], usize), CodecError> {
    let (count, mut buf, mut rem) = decode_len(buf, rem)?;
    let mut items = Vec::with_capacity(prealloc_len(count, buf, MIN_VALUE_SIZE));
    for _ in 0..count {
        let (item, b, r) = Value::decode_at_depth(buf, rem, depth)?;
        items.push(item);
        buf = b;
        rem = r;
    }
    Ok((Value::List(items), buf, rem))
}

impl Encode for Value {
    fn size_hint(&self) -> usize {
        SIZE_HINT_U8 + self.payload_size_hint()
    }

    fn encode<'a>(&self, buf: &'a mut [u8], rem: usize) -> Result<(&'a mut [u8], usize), CodecError> {
        let (buf, rem) = encode_u8(self.kind(), buf, rem)?;
        match self {
            Self::Bool(v) => encode_bool(*v, buf, rem),
            Self::U8(v) => encode_u8(*v, buf, rem),
            Self::U16(v) => encode_u16(*v, buf, rem),
            Self::U32(v) => encode_u32(*v, buf, rem),
            Self::U64(v) => encode_u64(*v, buf, rem),
            Self::U256(v) | Self::Bytes32(v) => write_raw(v, buf, rem),
            Self::String(s) => encode_str(s, buf, rem),
            Self::Bytes(b) => encode_bytes(b, buf, rem),
            Self::Struct(t) => t.encode(buf, rem),
            Self::List(items) => {
                let (mut buf, mut rem) = encode_len(items.len(), buf, rem)?;
                for item in items {
                    (buf, rem) = item.encode(buf, rem)?;
                }
                Ok((buf, rem))
            }
        }
    }
}

impl Decode for Value {
    fn decode(buf: &[u8], rem: usize) -> Result<(Self, &[u8], usize), CodecError> {
        Self::decode_at_depth(buf, rem, 0)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Self::U16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<Typed> for Value {
    fn from(v: Typed) -> Self {
        Self::Struct(v)
    }
}

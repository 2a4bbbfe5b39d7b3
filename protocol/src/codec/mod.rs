//! # Bounded Codec
//!
//! The binary encoding every relaytx wire type speaks. Each call receives a
//! buffer and a remaining-byte quota, consumes from both, and hands back what
//! is left. Nothing grows, nothing reallocates, and nothing allocates storage
//! sized from an untrusted length prefix without first charging that length
//! against the quota.
//!
//! ## Architecture
//!
//! ```text
//! error.rs     : CodecError, the one failure type for encode and decode
//! primitives.rs: integers, bools, length-prefixed bytes and strings
//! ```
//!
//! Composite types (`Typed`, `Tx`, `WithStatus`, ...) implement [`Encode`]
//! and [`Decode`] by threading `(buf, rem)` through their fields in order.
//!
//! ## Contract
//!
//! - `encode` writes at most `min(buf.len(), rem)` bytes and returns the
//!   unwritten tail of `buf` plus `rem` minus the bytes written.
//! - `decode` reads exactly the bytes the value occupies and returns the
//!   unread tail of `buf` plus `rem` minus the bytes read.
//! - `size_hint` is exact: a buffer of that length, and a quota of that
//!   many bytes, is always enough and never more than enough.
//! - On error, buffer contents are unspecified.

pub mod error;
pub mod primitives;

pub use error::CodecError;

use crate::config::MAX_BYTES;

/// A value with a bounded binary encoding.
pub trait Encode {
    /// Exact number of bytes [`Encode::encode`] will write.
    fn size_hint(&self) -> usize;

    /// Encodes `self` into the front of `buf`, charging the bytes written
    /// against `rem`.
    fn encode<'a>(&self, buf: &'a mut [u8], rem: usize) -> Result<(&'a mut [u8], usize), CodecError>;
}

/// A value that can be decoded from its bounded binary encoding.
pub trait Decode: Sized {
    /// Decodes a value from the front of `buf`, charging the bytes read
    /// against `rem`.
    fn decode(buf: &[u8], rem: usize) -> Result<(Self, &[u8], usize), CodecError>;
}

/// Encodes `value` into a freshly allocated buffer of exactly
/// `value.size_hint()` bytes, under the global [`MAX_BYTES`] quota.
pub fn to_bytes<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    let mut buf = vec![0u8; value.size_hint()];
    let unwritten = value.encode(&mut buf, MAX_BYTES)?.0.len();
    let written = buf.len() - unwritten;
    buf.truncate(written);
    Ok(buf)
}

/// Decodes a value from the front of `data` under the global [`MAX_BYTES`]
/// quota. Bytes after the encoded value are ignored.
pub fn from_bytes<T: Decode>(data: &[u8]) -> Result<T, CodecError> {
    let (value, _, _) = T::decode(data, MAX_BYTES)?;
    Ok(value)
}

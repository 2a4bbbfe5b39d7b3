//! Encoders and decoders for the fixed-width and length-prefixed building
//! blocks every other wire type is assembled from.
//!
//! Integers are big-endian. Strings and byte vectors carry a `u32` length
//! prefix. Every function checks the quota before it checks the buffer, and
//! decoders check a claimed length against the quota before allocating.

use super::{CodecError, Decode, Encode};
use crate::config::{
    size_hint_bytes, LENGTH_PREFIX_SIZE, SIZE_HINT_BOOL, SIZE_HINT_U16, SIZE_HINT_U32,
    SIZE_HINT_U64, SIZE_HINT_U8,
};

// ---------------------------------------------------------------------------
// Quota and raw bytes
// ---------------------------------------------------------------------------

/// Deducts `need` bytes from the quota `rem`.
pub fn take_quota(need: usize, rem: usize) -> Result<usize, CodecError> {
    rem.checked_sub(need).ok_or(CodecError::QuotaExceeded {
        need,
        remaining: rem,
    })
}

/// Copies `src` verbatim into the front of `buf`.
pub fn write_raw<'a>(
    src: &[u8],
    buf: &'a mut [u8],
    rem: usize,
) -> Result<(&'a mut [u8], usize), CodecError> {
    let rem = take_quota(src.len(), rem)?;
    if buf.len() < src.len() {
        return Err(CodecError::BufferTooSmall {
            need: src.len(),
            available: buf.len(),
        });
    }
    let (head, tail) = buf.split_at_mut(src.len());
    head.copy_from_slice(src);
    Ok((tail, rem))
}

/// Splits `n` bytes off the front of `buf` without copying.
pub fn read_raw(n: usize, buf: &[u8], rem: usize) -> Result<(&[u8], &[u8], usize), CodecError> {
    let rem = take_quota(n, rem)?;
    if buf.len() < n {
        return Err(CodecError::BufferTooSmall {
            need: n,
            available: buf.len(),
        });
    }
    let (head, tail) = buf.split_at(n);
    Ok((head, tail, rem))
}

fn read_array<const N: usize>(buf: &[u8], rem: usize) -> Result<([u8; N], &[u8], usize), CodecError> {
    let (head, tail, rem) = read_raw(N, buf, rem)?;
    let mut out = [0u8; N];
    out.copy_from_slice(head);
    Ok((out, tail, rem))
}

// ---------------------------------------------------------------------------
// Integers
// ---------------------------------------------------------------------------

pub fn encode_u8(v: u8, buf: &mut [u8], rem: usize) -> Result<(&mut [u8], usize), CodecError> {
    write_raw(&[v], buf, rem)
}

pub fn decode_u8(buf: &[u8], rem: usize) -> Result<(u8, &[u8], usize), CodecError> {
    let ([v], tail, rem) = read_array::<SIZE_HINT_U8>(buf, rem)?;
    Ok((v, tail, rem))
}

pub fn encode_u16(v: u16, buf: &mut [u8], rem: usize) -> Result<(&mut [u8], usize), CodecError> {
    write_raw(&v.to_be_bytes(), buf, rem)
}

pub fn decode_u16(buf: &[u8], rem: usize) -> Result<(u16, &[u8], usize), CodecError> {
    let (bytes, tail, rem) = read_array::<SIZE_HINT_U16>(buf, rem)?;
    Ok((u16::from_be_bytes(bytes), tail, rem))
}

pub fn encode_u32(v: u32, buf: &mut [u8], rem: usize) -> Result<(&mut [u8], usize), CodecError> {
    write_raw(&v.to_be_bytes(), buf, rem)
}

pub fn decode_u32(buf: &[u8], rem: usize) -> Result<(u32, &[u8], usize), CodecError> {
    let (bytes, tail, rem) = read_array::<SIZE_HINT_U32>(buf, rem)?;
    Ok((u32::from_be_bytes(bytes), tail, rem))
}

pub fn encode_u64(v: u64, buf: &mut [u8], rem: usize) -> Result<(&mut [u8], usize), CodecError> {
    write_raw(&v.to_be_bytes(), buf, rem)
}

pub fn decode_u64(buf: &[u8], rem: usize) -> Result<(u64, &[u8], usize), CodecError> {
    let (bytes, tail, rem) = read_array::<SIZE_HINT_U64>(buf, rem)?;
    Ok((u64::from_be_bytes(bytes), tail, rem))
}

pub fn encode_bool(v: bool, buf: &mut [u8], rem: usize) -> Result<(&mut [u8], usize), CodecError> {
    encode_u8(u8::from(v), buf, rem)
}

pub fn decode_bool(buf: &[u8], rem: usize) -> Result<(bool, &[u8], usize), CodecError> {
    let (byte, tail, rem) = decode_u8(buf, rem)?;
    match byte {
        0 => Ok((false, tail, rem)),
        1 => Ok((true, tail, rem)),
        other => Err(CodecError::InvalidBool(other)),
    }
}

// ---------------------------------------------------------------------------
// Length-prefixed data
// ---------------------------------------------------------------------------

/// Writes a `u32` length prefix for a field of `len` bytes.
pub fn encode_len(len: usize, buf: &mut [u8], rem: usize) -> Result<(&mut [u8], usize), CodecError> {
    let len = u32::try_from(len).map_err(|_| CodecError::LengthOverflow { len })?;
    encode_u32(len, buf, rem)
}

/// Reads a `u32` length prefix.
pub fn decode_len(buf: &[u8], rem: usize) -> Result<(usize, &[u8], usize), CodecError> {
    let (len, tail, rem) = decode_u32(buf, rem)?;
    Ok((len as usize, tail, rem))
}

pub fn encode_bytes<'a>(
    data: &[u8],
    buf: &'a mut [u8],
    rem: usize,
) -> Result<(&'a mut [u8], usize), CodecError> {
    let (buf, rem) = encode_len(data.len(), buf, rem)?;
    write_raw(data, buf, rem)
}

/// Reads a length-prefixed byte field as a borrowed slice.
///
/// The claimed length is charged against the quota before the buffer is
/// consulted, so an oversized claim fails with
/// [`CodecError::QuotaExceeded`] regardless of how short the buffer is.
pub fn decode_bytes_ref(buf: &[u8], rem: usize) -> Result<(&[u8], &[u8], usize), CodecError> {
    let (len, buf, rem) = decode_len(buf, rem)?;
    read_raw(len, buf, rem)
}

pub fn decode_bytes(buf: &[u8], rem: usize) -> Result<(Vec<u8>, &[u8], usize), CodecError> {
    let (data, tail, rem) = decode_bytes_ref(buf, rem)?;
    Ok((data.to_vec(), tail, rem))
}

pub fn encode_str<'a>(s: &str, buf: &'a mut [u8], rem: usize) -> Result<(&'a mut [u8], usize), CodecError> {
    encode_bytes(s.as_bytes(), buf, rem)
}

/// Reads a length-prefixed UTF-8 string as a borrowed `&str`.
pub fn decode_str_ref(buf: &[u8], rem: usize) -> Result<(&str, &[u8], usize), CodecError> {
    let (data, tail, rem) = decode_bytes_ref(buf, rem)?;
    let s = std::str::from_utf8(data).map_err(|_| CodecError::InvalidUtf8)?;
    Ok((s, tail, rem))
}

pub fn decode_string(buf: &[u8], rem: usize) -> Result<(String, &[u8], usize), CodecError> {
    let (s, tail, rem) = decode_str_ref(buf, rem)?;
    Ok((s.to_owned(), tail, rem))
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

macro_rules! impl_fixed {
    ($ty:ty, $size:expr, $enc:ident, $dec:ident) => {
        impl Encode for $ty {
            fn size_hint(&self) -> usize {
                $size
            }

            fn encode<'a>(&self, buf: &'a mut [u8], rem: usize) -> Result<(&'a mut [u8], usize), CodecError> {
                $enc(*self, buf, rem)
            }
        }

        impl Decode for $ty {
            fn decode(buf: &[u8], rem: usize) -> Result<(Self, &[u8], usize), CodecError> {
                $dec(buf, rem)
            }
        }
    };
}

impl_fixed!(u8, SIZE_HINT_U8, encode_u8, decode_u8);
impl_fixed!(u16, SIZE_HINT_U16, encode_u16, decode_u16);
impl_fixed!(u32, SIZE_HINT_U32, encode_u32, decode_u32);
impl_fixed!(u64, SIZE_HINT_U64, encode_u64, decode_u64);
impl_fixed!(bool, SIZE_HINT_BOOL, encode_bool, decode_bool);

impl Encode for str {
    fn size_hint(&self) -> usize {
        size_hint_bytes(self.len())
    }

    fn encode<'a>(&self, buf: &'a mut [u8], rem: usize) -> Result<(&'a mut [u8], usize), CodecError> {
        encode_str(self, buf, rem)
    }
}

impl Encode for String {
    fn size_hint(&self) -> usize {
        self.as_str().size_hint()
    }

    fn encode<'a>(&self, buf: &'a mut [u8], rem: usize) -> Result<(&'a mut [u8], usize), CodecError> {
        encode_str(self, buf, rem)
    }
}

impl Decode for String {
    fn decode(buf: &[u8], rem: usize) -> Result<(Self, &[u8], usize), CodecError> {
        decode_string(buf, rem)
    }
}

impl Encode for Vec<u8> {
    fn size_hint(&self) -> usize {
        size_hint_bytes(self.len())
    }

    fn encode<'a>(&self, buf: &'a mut [u8], rem: usize) -> Result<(&'a mut [u8], usize), CodecError> {
        encode_bytes(self, buf, rem)
    }
}

impl Decode for Vec<u8> {
    fn decode(buf: &[u8], rem: usize) -> Result<(Self, &[u8], usize), CodecError> {
        decode_bytes(buf, rem)
    }
}

/// Fixed-size arrays are written raw, without a length prefix.
impl<const N: usize> Encode for [u8; N] {
    fn size_hint(&self) -> usize {
        N
    }

    fn encode<'a>(&self, buf: &'a mut [u8], rem: usize) -> Result<(&'a mut [u8], usize), CodecError> {
        write_raw(self, buf, rem)
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn decode(buf: &[u8], rem: usize) -> Result<(Self, &[u8], usize), CodecError> {
        read_array::<N>(buf, rem)
    }
}

// Keep the prefix constant honest: a length prefix is a u32.
const _: () = assert!(LENGTH_PREFIX_SIZE == SIZE_HINT_U32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_big_endian() {
        let mut buf = [0u8; 8];
        let (tail, rem) = encode_u32(0x0102_0304, &mut buf, 100).unwrap();
        assert_eq!(tail.len(), 4);
        assert_eq!(rem, 96);
        assert_eq!(&buf[..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn quota_is_checked_before_buffer() {
        let mut buf = [0u8; 0];
        let err = encode_u64(7, &mut buf, 3).unwrap_err();
        assert_eq!(err, CodecError::QuotaExceeded { need: 8, remaining: 3 });

        let err = encode_u64(7, &mut buf, 8).unwrap_err();
        assert_eq!(err, CodecError::BufferTooSmall { need: 8, available: 0 });
    }

    #[test]
    fn bytes_roundtrip_consumes_prefix_and_payload() {
        let mut buf = vec![0u8; 9];
        let (tail, rem) = encode_bytes(b"hello", &mut buf, 9).unwrap();
        assert!(tail.is_empty());
        assert_eq!(rem, 0);

        let (data, tail, rem) = decode_bytes(&buf, 9).unwrap();
        assert_eq!(data, b"hello");
        assert!(tail.is_empty());
        assert_eq!(rem, 0);
    }

    #[test]
    fn huge_claimed_length_fails_on_quota_before_allocating() {
        // Prefix claims 4 GiB - 1, buffer holds nothing after it.
        let buf = [0xFF, 0xFF, 0xFF, 0xFF];
        let err = decode_bytes(&buf, 1024).unwrap_err();
        assert_eq!(
            err,
            CodecError::QuotaExceeded {
                need: u32::MAX as usize,
                remaining: 1020,
            }
        );
    }

    #[test]
    fn claimed_length_within_quota_but_past_buffer_fails() {
        let buf = [0, 0, 0, 10, b'a', b'b'];
        let err = decode_bytes(&buf, 1024).unwrap_err();
        assert_eq!(err, CodecError::BufferTooSmall { need: 10, available: 2 });
    }

    #[test]
    fn invalid_utf8_rejected() {
        let buf = [0, 0, 0, 2, 0xC3, 0x28];
        assert_eq!(decode_string(&buf, 100).unwrap_err(), CodecError::InvalidUtf8);
    }

    #[test]
    fn invalid_bool_rejected() {
        assert_eq!(decode_bool(&[2], 1).unwrap_err(), CodecError::InvalidBool(2));
        assert!(decode_bool(&[1], 1).unwrap().0);
    }

    #[test]
    fn fixed_array_has_no_prefix() {
        let arr = [9u8; 32];
        assert_eq!(arr.size_hint(), 32);
        let mut buf = [0u8; 32];
        let (tail, rem) = arr.encode(&mut buf, 32).unwrap();
        assert!(tail.is_empty());
        assert_eq!(rem, 0);
        let (back, _, _) = <[u8; 32]>::decode(&buf, 32).unwrap();
        assert_eq!(back, arr);
    }
}

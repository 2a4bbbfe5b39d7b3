//! # Protocol Configuration & Constants
//!
//! Every magic number in relaytx lives here. If a byte budget, a digest
//! length or a wire-format size shows up anywhere else as a literal, it
//! belongs in this file instead.
//!
//! Changing any of the wire-format constants changes transaction hashes.
//! Treat them as frozen once transactions have been signed against them.

// ---------------------------------------------------------------------------
// Memory Bounds
// ---------------------------------------------------------------------------

/// Upper bound on the number of bytes any single top-level encode or decode
/// may consume. Every bounded codec call starts from this quota unless the
/// caller threads a smaller one through.
pub const MAX_BYTES: usize = 64 * 1024 * 1024;

/// Deepest nesting of structs and lists the typed-value decoder will follow.
pub const MAX_TYPED_DEPTH: usize = 64;

/// Most list elements or record fields a decoder reserves up front. Longer
/// sequences grow as their elements actually decode.
pub const MAX_PREALLOC_ITEMS: usize = 1024;

// ---------------------------------------------------------------------------
// Wire Format Sizes
// ---------------------------------------------------------------------------

/// Encoded size of a `u8`.
pub const SIZE_HINT_U8: usize = 1;

/// Encoded size of a `u16`.
pub const SIZE_HINT_U16: usize = 2;

/// Encoded size of a `u32`.
pub const SIZE_HINT_U32: usize = 4;

/// Encoded size of a `u64`.
pub const SIZE_HINT_U64: usize = 8;

/// Encoded size of a `bool`. One byte, 0 or 1, nothing else.
pub const SIZE_HINT_BOOL: usize = 1;

/// Length prefix carried by every variable-length field (strings, byte
/// vectors, struct field counts, list lengths). Big-endian `u32`.
pub const LENGTH_PREFIX_SIZE: usize = SIZE_HINT_U32;

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Transaction hashes are SHA-256 digests.
pub const HASH_FUNCTION: &str = "SHA-256";

/// Digest length in bytes.
pub const HASH_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

/// Encoded size of a length-prefixed string or byte vector of `len` bytes.
pub const fn size_hint_bytes(len: usize) -> usize {
    LENGTH_PREFIX_SIZE + len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_size_hints() {
        assert_eq!(SIZE_HINT_U8, std::mem::size_of::<u8>());
        assert_eq!(SIZE_HINT_U16, std::mem::size_of::<u16>());
        assert_eq!(SIZE_HINT_U32, std::mem::size_of::<u32>());
        assert_eq!(SIZE_HINT_U64, std::mem::size_of::<u64>());
    }

    #[test]
    fn test_size_hint_bytes_includes_prefix() {
        assert_eq!(size_hint_bytes(0), 4);
        assert_eq!(size_hint_bytes(14), 18);
    }

    #[test]
    fn test_max_bytes_fits_length_prefix() {
        // A length prefix must be able to describe anything the quota allows.
        assert!(MAX_BYTES <= u32::MAX as usize);
    }

    #[test]
    fn test_hash_length_matches_sha256() {
        assert_eq!(HASH_LENGTH, 32);
        assert_eq!(HASH_FUNCTION, "SHA-256");
    }
}

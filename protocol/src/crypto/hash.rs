//! # Hashing Utilities
//!
//! Transaction hashes are SHA-256 digests of the bounded encoding of a
//! transaction's identifying fields. This module is the only place the crate
//! touches the hash primitive directly; everything else goes through
//! [`sha256`].

use sha2::{Digest, Sha256};

use crate::config::HASH_LENGTH;

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use relaytx_protocol::crypto::sha256;
///
/// let hash = sha256(b"BTC/toEthereum");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; HASH_LENGTH] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

//! # Cryptographic Primitives
//!
//! Thin wrappers around audited implementations. relaytx needs exactly one
//! primitive, a collision-resistant fixed-length hash, and uses SHA-256 via
//! the `sha2` crate.

pub mod hash;

pub use hash::sha256;

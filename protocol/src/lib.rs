// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # relaytx Protocol Core Library
//!
//! Cross-chain transaction records for a bridge network: which asset moves,
//! from which chain to which chain, and how the record is hashed and put on
//! the wire.
//!
//! ## Architecture
//!
//! - **codec**: Bounded binary codec. Every read and write is charged
//!   against a byte quota, so hostile length prefixes cannot force huge
//!   allocations.
//! - **pack**: Self-describing typed values carried as transaction input
//!   and output.
//! - **registry**: The supported assets and host chains.
//! - **transaction**: Selectors, versions, hashes and lifecycle status.
//! - **crypto**: SHA-256.
//! - **testutil**: Seeded random generators and codec property checks,
//!   behind the default `testutil` feature.
//! - **config**: Protocol constants.
//!
//! ## Design Philosophy
//!
//! 1. Decoding never trusts a length it has not charged to the quota.
//! 2. Classification is total. Garbage selectors yield empty values.
//! 3. Nothing here holds mutable global state.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod pack;
pub mod registry;
pub mod serde_hex;
#[cfg(feature = "testutil")]
pub mod testutil;
pub mod transaction;

//! # Transaction Module
//!
//! The cross-chain transaction record, its routing selector, its format
//! version and its lifecycle status.
//!
//! ## Architecture
//!
//! ```text
//! selector.rs  Selector token, Route classification, lookup tables
//! version.rs   Wire format revision
//! tx.rs        Tx, TxHash and the hashing functions
//! status.rs    Status and WithStatus
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build**: [`Tx::new`] hashes `version ‖ selector ‖ input`.
//! 2. **Route**: [`Selector::classify`] resolves asset, source and destination.
//! 3. **Track**: [`WithStatus`] carries the transaction through
//!    `confirming`, `pending`, `executing` and `done`.

pub mod selector;
pub mod status;
pub mod tx;
pub mod version;

pub use selector::{Route, Selector};
pub use status::{Status, StatusError, WithStatus};
pub use tx::{new_tx_hash, new_tx_hash_into_buffer, tx_hash_size_hint, Tx, TxError, TxHash};
pub use version::Version;

/// Hashes of `txs`, in order.
pub fn hashes(txs: &[Tx]) -> Vec<TxHash> {
    txs.iter().map(|tx| tx.hash).collect()
}

/// Pairs every transaction with the same status.
pub fn zip_status(txs: Vec<Tx>, status: Status) -> Vec<WithStatus> {
    txs.into_iter().map(|tx| WithStatus::new(tx, status)).collect()
}

/// Drops the status from every pair, keeping the transactions in order.
pub fn strip_status(txs: Vec<WithStatus>) -> Vec<Tx> {
    txs.into_iter().map(|with| with.tx).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::Typed;

    fn txs() -> Vec<Tx> {
        ["BTC/toEthereum", "FIL/fromPolygon", "ZEC/toPolygonFromEthereum"]
            .into_iter()
            .map(|s| Tx::new(Selector::from(s), Typed::new()).unwrap())
            .collect()
    }

    #[test]
    fn hashes_preserve_order() {
        let txs = txs();
        let hs = hashes(&txs);
        assert_eq!(hs.len(), 3);
        for (tx, h) in txs.iter().zip(&hs) {
            assert_eq!(&tx.hash, h);
        }
        assert!(hashes(&[]).is_empty());
    }

    #[test]
    fn zip_then_strip_is_identity() {
        let txs = txs();
        let zipped = zip_status(txs.clone(), Status::PENDING);
        assert!(zipped.iter().all(|w| w.status == Status::PENDING));
        assert_eq!(strip_status(zipped), txs);
    }
}

//! The transaction record and its content-addressed hash.
//!
//! A transaction hash is SHA-256 over the bounded encoding of
//! `version ‖ selector ‖ input`. The output is produced later by execution
//! and is deliberately not part of the preimage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use super::selector::{Route, Selector};
use super::version::Version;
use crate::codec::{CodecError, Decode, Encode};
use crate::config::{HASH_LENGTH, MAX_BYTES};
use crate::crypto::sha256;
use crate::pack::Typed;
use crate::registry::Registry;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from building or checking a transaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TxError {
    /// One of the hashed fields could not be encoded within the quota.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The stored hash does not match the hash of the stored fields.
    #[error("transaction hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: TxHash, actual: TxHash },
}

// ---------------------------------------------------------------------------
// TxHash
// ---------------------------------------------------------------------------

/// 32-byte SHA-256 transaction hash. Renders as lowercase hex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(#[serde(with = "crate::serde_hex::fixed")] [u8; HASH_LENGTH]);

impl TxHash {
    pub const fn from_bytes(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for TxHash {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; HASH_LENGTH];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl Encode for TxHash {
    fn size_hint(&self) -> usize {
        HASH_LENGTH
    }

    fn encode<'a>(&self, buf: &'a mut [u8], rem: usize) -> Result<(&'a mut [u8], usize), CodecError> {
        self.0.encode(buf, rem)
    }
}

impl Decode for TxHash {
    fn decode(buf: &[u8], rem: usize) -> Result<(Self, &[u8], usize), CodecError> {
        let (bytes, buf, rem) = <[u8; HASH_LENGTH]>::decode(buf, rem)?;
        Ok((Self(bytes), buf, rem))
    }
}

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Number of bytes the hash preimage of `(version, selector, input)` takes.
pub fn tx_hash_size_hint(version: Version, selector: &Selector, input: &Typed) -> usize {
    version.size_hint() + selector.size_hint() + input.size_hint()
}

/// Computes the hash of a transaction with the given fields.
///
/// Allocates one buffer of exactly [`tx_hash_size_hint`] bytes. Fails when
/// the fields cannot be encoded within [`MAX_BYTES`].
pub fn new_tx_hash(version: Version, selector: &Selector, input: &Typed) -> Result<TxHash, CodecError> {
    let mut buf = vec![0u8; tx_hash_size_hint(version, selector, input)];
    new_tx_hash_into_buffer(version, selector, input, &mut buf)
}

/// Computes the hash of a transaction using a caller-supplied scratch
/// buffer, for hashing many transactions without reallocating.
///
/// A buffer shorter than [`tx_hash_size_hint`] fails with
/// [`CodecError::BufferTooSmall`]. Only the written prefix is hashed, so a
/// longer buffer yields the same hash as an exact one.
pub fn new_tx_hash_into_buffer(
    version: Version,
    selector: &Selector,
    input: &Typed,
    data: &mut [u8],
) -> Result<TxHash, CodecError> {
    let capacity = data.len();
    let unwritten = encode_preimage(version, selector, input, data)
        .map_err(|err| {
            debug!(%selector, %err, "cannot compute transaction hash");
            err
        })?
        .len();
    Ok(TxHash(sha256(&data[..capacity - unwritten])))
}

fn encode_preimage<'a>(
    version: Version,
    selector: &Selector,
    input: &Typed,
    buf: &'a mut [u8],
) -> Result<&'a mut [u8], CodecError> {
    let (buf, rem) = version.encode(buf, MAX_BYTES)?;
    let (buf, rem) = selector.encode(buf, rem)?;
    let (buf, _) = input.encode(buf, rem)?;
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Tx
// ---------------------------------------------------------------------------

/// A cross-chain transaction.
///
/// Build with [`Tx::new`] to get a self-consistent hash. Assembling the
/// struct by hand (or decoding it from the wire) can yield a transaction
/// whose `hash` does not match its fields; [`Tx::verify_hash`] detects that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    /// `sha256(version ‖ selector ‖ input)` in bounded encoding.
    pub hash: TxHash,

    /// Format revision of the remaining fields.
    pub version: Version,

    /// Which asset moves, and between which chains.
    pub selector: Selector,

    /// Values supplied by the submitter. Fixed at construction.
    #[serde(rename = "in")]
    pub input: Typed,

    /// Values produced by execution. Empty until executed; not hashed.
    #[serde(rename = "out")]
    pub output: Typed,
}

impl Tx {
    /// Builds a transaction at [`Version::CURRENT`] with an empty output and
    /// its hash already computed.
    pub fn new(selector: Selector, input: Typed) -> Result<Self, CodecError> {
        let version = Version::CURRENT;
        let hash = new_tx_hash(version, &selector, &input)?;
        Ok(Self {
            hash,
            version,
            selector,
            input,
            output: Typed::new(),
        })
    }

    /// Recomputes the hash from the current fields.
    pub fn compute_hash(&self) -> Result<TxHash, CodecError> {
        new_tx_hash(self.version, &self.selector, &self.input)
    }

    /// Checks that the stored hash matches the stored fields.
    pub fn verify_hash(&self) -> Result<(), TxError> {
        let expected = self.compute_hash()?;
        if expected != self.hash {
            return Err(TxError::HashMismatch {
                expected,
                actual: self.hash,
            });
        }
        Ok(())
    }

    /// Classifies the selector against `registry`.
    pub fn route(&self, registry: &Registry) -> Route {
        self.selector.classify(registry)
    }
}

impl Encode for Tx {
    fn size_hint(&self) -> usize {
        self.hash.size_hint()
            + self.version.size_hint()
            + self.selector.size_hint()
            + self.input.size_hint()
            + self.output.size_hint()
    }

    fn encode<'a>(&self, buf: &'a mut [u8], rem: usize) -> Result<(&'a mut [u8], usize), CodecError> {
        let (buf, rem) = self.hash.encode(buf, rem)?;
        let (buf, rem) = self.version.encode(buf, rem)?;
        let (buf, rem) = self.selector.encode(buf, rem)?;
        let (buf, rem) = self.input.encode(buf, rem)?;
        self.output.encode(buf, rem)
    }
}

impl Decode for Tx {
    fn decode(buf: &[u8], rem: usize) -> Result<(Self, &[u8], usize), CodecError> {
        let (hash, buf, rem) = TxHash::decode(buf, rem)?;
        let (version, buf, rem) = Version::decode(buf, rem)?;
        let (selector, buf, rem) = Selector::decode(buf, rem)?;
        let (input, buf, rem) = Typed::decode(buf, rem)?;
        let (output, buf, rem) = Typed::decode(buf, rem)?;
        Ok((
            Self {
                hash,
                version,
                selector,
                input,
                output,
            },
            buf,
            rem,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{from_bytes, to_bytes};
    use crate::pack::Value;

    fn sample_input() -> Typed {
        Typed::new()
            .with("txid", vec![1u8, 2, 3])
            .with("txindex", 0u32)
            .with("amount", Value::U256([0; 32]))
    }

    #[test]
    fn new_tx_is_self_consistent() {
        let tx = Tx::new(Selector::from("BTC/toEthereum"), sample_input()).unwrap();
        assert_eq!(tx.version, Version::CURRENT);
        assert!(tx.output.is_empty());
        tx.verify_hash().unwrap();
    }

    #[test]
    fn hash_is_sha256_of_preimage() {
        let selector = Selector::from("FIL/fromPolygon");
        let input = sample_input();
        let mut preimage = to_bytes(&Version::V1).unwrap();
        preimage.extend(to_bytes(&selector).unwrap());
        preimage.extend(to_bytes(&input).unwrap());
        let hash = new_tx_hash(Version::V1, &selector, &input).unwrap();
        assert_eq!(hash.as_bytes(), &sha256(&preimage));
    }

    #[test]
    fn caller_buffer_gives_same_hash() {
        let selector = Selector::from("ZEC/toPolygonFromEthereum");
        let input = sample_input();
        let expected = new_tx_hash(Version::V1, &selector, &input).unwrap();

        let exact = tx_hash_size_hint(Version::V1, &selector, &input);
        let mut buf = vec![0u8; exact];
        assert_eq!(new_tx_hash_into_buffer(Version::V1, &selector, &input, &mut buf).unwrap(), expected);

        let mut larger = vec![0xFFu8; exact + 17];
        assert_eq!(
            new_tx_hash_into_buffer(Version::V1, &selector, &input, &mut larger).unwrap(),
            expected
        );
    }

    #[test]
    fn short_caller_buffer_is_rejected() {
        let selector = Selector::from("BTC/toEthereum");
        let input = sample_input();
        let exact = tx_hash_size_hint(Version::V1, &selector, &input);
        let mut buf = vec![0u8; exact - 1];
        let err = new_tx_hash_into_buffer(Version::V1, &selector, &input, &mut buf).unwrap_err();
        assert!(matches!(err, CodecError::BufferTooSmall { .. }));
    }

    #[test]
    fn output_is_not_hashed() {
        let mut tx = Tx::new(Selector::from("BTC/toEthereum"), sample_input()).unwrap();
        tx.output = Typed::new().with("txid", vec![9u8; 32]);
        tx.verify_hash().unwrap();
    }

    #[test]
    fn tampered_fields_are_detected() {
        let mut tx = Tx::new(Selector::from("BTC/toEthereum"), sample_input()).unwrap();
        tx.selector = Selector::from("BTC/toSolana");
        assert!(matches!(tx.verify_hash(), Err(TxError::HashMismatch { .. })));

        let mut tx = Tx::new(Selector::from("BTC/toEthereum"), sample_input()).unwrap();
        tx.version = Version::V0;
        assert!(matches!(tx.verify_hash(), Err(TxError::HashMismatch { .. })));
    }

    #[test]
    fn binary_roundtrip() {
        let mut tx = Tx::new(Selector::from("DOGE/fromSolana"), sample_input()).unwrap();
        tx.output = Typed::new().with("hash", Value::Bytes32([7; 32]));
        let bytes = to_bytes(&tx).unwrap();
        assert_eq!(bytes.len(), tx.size_hint());
        assert_eq!(&bytes[..32], tx.hash.as_bytes());
        assert_eq!(from_bytes::<Tx>(&bytes).unwrap(), tx);
    }

    #[test]
    fn json_uses_in_and_out_keys() {
        let tx = Tx::new(Selector::from("BTC/toEthereum"), sample_input()).unwrap();
        let json: serde_json::Value = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["hash"], tx.hash.to_hex());
        assert_eq!(json["version"], "1");
        assert!(json["in"].is_array());
        assert!(json["out"].is_array());
        let back: Tx = serde_json::from_value(json).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn tx_hash_hex_parsing() {
        let tx = Tx::new(Selector::from("BTC/toEthereum"), Typed::new()).unwrap();
        let parsed: TxHash = tx.hash.to_hex().parse().unwrap();
        assert_eq!(parsed, tx.hash);
        assert!("abcd".parse::<TxHash>().is_err());
    }

    #[test]
    fn route_uses_registry() {
        let tx = Tx::new(Selector::from("BTC/toEthereum"), Typed::new()).unwrap();
        assert!(tx.route(&Registry::default()).is_lock());
    }
}

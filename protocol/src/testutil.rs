//! Seeded random generators and codec property checks.
//!
//! Everything here takes an explicit `&mut impl Rng`, so a failing property
//! can be replayed from its seed with [`rng_from_seed`]. The generators are
//! public so downstream crates can test their own storage and gossip layers
//! against realistic transactions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use thiserror::Error;

use crate::codec::{to_bytes, CodecError, Decode, Encode};
use crate::config::MAX_BYTES;
use crate::pack::{Typed, Value};
use crate::registry::Registry;
use crate::transaction::{new_tx_hash, Selector, Status, Tx, TxHash, Version, WithStatus};

/// Upper bound (exclusive) on the length of random byte and string fields.
const MAX_RANDOM_LEN: usize = 100;

/// Upper bound (inclusive) on the length of fuzz inputs.
const MAX_FUZZ_LEN: usize = 1024;

/// Deterministic generator for a given seed.
pub fn rng_from_seed(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

// ---------------------------------------------------------------------------
// Random values
// ---------------------------------------------------------------------------

fn random_bytes<R: Rng + ?Sized>(r: &mut R) -> Vec<u8> {
    let len = r.gen_range(0..MAX_RANDOM_LEN);
    let mut bytes = vec![0u8; len];
    r.fill(&mut bytes[..]);
    bytes
}

fn random_printable<R: Rng + ?Sized>(r: &mut R) -> String {
    let len = r.gen_range(0..MAX_RANDOM_LEN);
    (0..len).map(|_| char::from(r.gen_range(b' '..=b'~'))).collect()
}

/// A good or a bad transaction, with equal probability.
pub fn random_tx<R: Rng + ?Sized>(registry: &Registry, r: &mut R) -> Result<Tx, CodecError> {
    if r.gen_bool(0.5) {
        random_good_tx(registry, r)
    } else {
        Ok(random_bad_tx(r))
    }
}

/// The hash of a good transaction, or the zero hash.
pub fn random_tx_hash<R: Rng + ?Sized>(registry: &Registry, r: &mut R) -> Result<TxHash, CodecError> {
    if r.gen_bool(0.5) {
        Ok(random_good_tx(registry, r)?.hash)
    } else {
        Ok(TxHash::default())
    }
}

/// One of the four post-submission statuses. Never `nil`.
pub fn random_tx_status<R: Rng + ?Sized>(r: &mut R) -> Status {
    match r.gen_range(0..4) {
        0 => Status::CONFIRMING,
        1 => Status::PENDING,
        2 => Status::EXECUTING,
        _ => Status::DONE,
    }
}

/// A version tag a node accepts: unknown, `0` or (most often) `1`.
pub fn random_good_tx_version<R: Rng + ?Sized>(r: &mut R) -> Version {
    match r.gen_range(0..4) {
        0 => Version::Unknown,
        1 => Version::V0,
        _ => Version::V1,
    }
}

/// A selector drawn uniformly from everything `registry` accepts.
pub fn random_good_selector<R: Rng + ?Sized>(registry: &Registry, r: &mut R) -> Selector {
    let selectors = registry.all_selectors();
    if selectors.is_empty() {
        return Selector::default();
    }
    selectors[r.gen_range(0..selectors.len())].clone()
}

/// Either the empty selector or a printable string with no separator.
pub fn random_bad_selector<R: Rng + ?Sized>(r: &mut R) -> Selector {
    if r.gen_bool(0.5) {
        return Selector::default();
    }
    Selector::new(random_printable(r).replace('/', ""))
}

/// A version 1 input with the fields a lock or release carries.
pub fn random_tx_input<R: Rng + ?Sized>(r: &mut R) -> Typed {
    Typed::new()
        .with("txid", random_bytes(r))
        .with("txindex", r.gen::<u32>())
        .with("amount", Value::U256(r.gen()))
        .with("payload", random_bytes(r))
        .with("phash", Value::Bytes32(r.gen()))
        .with("to", random_printable(r))
        .with("nonce", Value::Bytes32(r.gen()))
        .with("nhash", Value::Bytes32(r.gen()))
        .with("gpubkey", random_bytes(r))
        .with("ghash", Value::Bytes32(r.gen()))
}

/// A version 1 transaction with a valid selector, a random input, an empty
/// output and a correct hash.
pub fn random_good_tx<R: Rng + ?Sized>(registry: &Registry, r: &mut R) -> Result<Tx, CodecError> {
    let selector = random_good_selector(registry, r);
    let input = random_tx_input(r);
    let version = Version::V1;
    let hash = new_tx_hash(version, &selector, &input)?;
    Ok(Tx {
        hash,
        version,
        selector,
        input,
        output: Typed::new(),
    })
}

pub fn random_good_txs<R: Rng + ?Sized>(registry: &Registry, r: &mut R, n: usize) -> Result<Vec<Tx>, CodecError> {
    (0..n).map(|_| random_good_tx(registry, r)).collect()
}

pub fn random_good_tx_with_status<R: Rng + ?Sized>(
    registry: &Registry,
    r: &mut R,
) -> Result<WithStatus, CodecError> {
    let tx = random_good_tx(registry, r)?;
    Ok(WithStatus::new(tx, random_tx_status(r)))
}

pub fn random_good_txs_with_status<R: Rng + ?Sized>(
    registry: &Registry,
    r: &mut R,
    n: usize,
) -> Result<Vec<WithStatus>, CodecError> {
    (0..n).map(|_| random_good_tx_with_status(registry, r)).collect()
}

/// An otherwise empty transaction carrying a random hash, which therefore
/// never matches its fields.
pub fn random_bad_tx<R: Rng + ?Sized>(r: &mut R) -> Tx {
    Tx {
        hash: TxHash::from_bytes(r.gen()),
        ..Tx::default()
    }
}

pub fn random_bad_txs<R: Rng + ?Sized>(r: &mut R, n: usize) -> Vec<Tx> {
    (0..n).map(|_| random_bad_tx(r)).collect()
}

// ---------------------------------------------------------------------------
// Codec property checks
// ---------------------------------------------------------------------------

/// A violated codec property.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("size hint {hint} but {written} bytes written")]
    SizeMismatch { hint: usize, written: usize },

    #[error("decoded value differs from the original")]
    Unequal,

    #[error("decode left {unread} bytes unread and {quota} quota unspent")]
    Unconsumed { unread: usize, quota: usize },

    #[error("{operation} succeeded with only {limit} of {need} bytes")]
    UnexpectedSuccess {
        operation: &'static str,
        limit: usize,
        need: usize,
    },
}

/// Encodes then decodes `value`, checking the size hint is exact, that
/// decoding consumes exactly what was written, and that the result equals
/// the original.
pub fn marshal_unmarshal_check<T>(value: &T) -> Result<(), CheckError>
where
    T: Encode + Decode + PartialEq + Debug,
{
    let data = to_bytes(value)?;
    let hint = value.size_hint();
    if data.len() != hint {
        return Err(CheckError::SizeMismatch {
            hint,
            written: data.len(),
        });
    }
    let (decoded, unread, rem) = T::decode(&data, data.len())?;
    if !unread.is_empty() || rem != 0 {
        return Err(CheckError::Unconsumed {
            unread: unread.len(),
            quota: rem,
        });
    }
    if &decoded != value {
        return Err(CheckError::Unequal);
    }
    Ok(())
}

/// Every buffer shorter than the size hint must make `encode` fail.
pub fn marshal_buf_too_small<T: Encode>(value: &T) -> Result<(), CheckError> {
    let need = value.size_hint();
    for limit in 0..need {
        let mut buf = vec![0u8; limit];
        if value.encode(&mut buf, MAX_BYTES).is_ok() {
            return Err(CheckError::UnexpectedSuccess {
                operation: "encode",
                limit,
                need,
            });
        }
    }
    Ok(())
}

/// Every quota smaller than the size hint must make `encode` fail.
pub fn marshal_rem_too_small<T: Encode>(value: &T) -> Result<(), CheckError> {
    let need = value.size_hint();
    let mut buf = vec![0u8; need];
    for limit in 0..need {
        if value.encode(&mut buf, limit).is_ok() {
            return Err(CheckError::UnexpectedSuccess {
                operation: "encode",
                limit,
                need,
            });
        }
    }
    Ok(())
}

/// Every truncation of the encoding must make `decode` fail.
pub fn unmarshal_buf_too_small<T: Encode + Decode>(value: &T) -> Result<(), CheckError> {
    let data = to_bytes(value)?;
    let need = data.len();
    for limit in 0..need {
        if T::decode(&data[..limit], MAX_BYTES).is_ok() {
            return Err(CheckError::UnexpectedSuccess {
                operation: "decode",
                limit,
                need,
            });
        }
    }
    Ok(())
}

/// Every quota smaller than the encoding must make `decode` fail.
pub fn unmarshal_rem_too_small<T: Encode + Decode>(value: &T) -> Result<(), CheckError> {
    let data = to_bytes(value)?;
    let need = data.len();
    for limit in 0..need {
        if T::decode(&data, limit).is_ok() {
            return Err(CheckError::UnexpectedSuccess {
                operation: "decode",
                limit,
                need,
            });
        }
    }
    Ok(())
}

/// Decodes random bytes as `T`. Errors are expected and discarded; the
/// property is that decoding returns at all.
pub fn fuzz<T: Decode, R: Rng + ?Sized>(r: &mut R) {
    let mut data = vec![0u8; r.gen_range(0..=MAX_FUZZ_LEN)];
    r.fill(&mut data[..]);
    let _ = T::decode(&data, MAX_BYTES);
}

/// Parses random bytes as JSON `T`, discarding errors.
pub fn json_fuzz<T: DeserializeOwned, R: Rng + ?Sized>(r: &mut R) {
    let mut data = vec![0u8; r.gen_range(0..=MAX_FUZZ_LEN)];
    r.fill(&mut data[..]);
    let _ = serde_json::from_slice::<T>(&data);
}

/// Serialises `value` to JSON and back, checking the result is equal.
pub fn json_marshal_unmarshal_check<T>(value: &T) -> Result<(), CheckError>
where
    T: Serialize + DeserializeOwned + PartialEq + Debug,
{
    let data = serde_json::to_vec(value)?;
    let decoded: T = serde_json::from_slice(&data)?;
    if &decoded != value {
        return Err(CheckError::Unequal);
    }
    Ok(())
}

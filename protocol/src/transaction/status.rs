//! Transaction lifecycle status.
//!
//! Status is metadata about where a transaction is in processing. It lives
//! next to a [`Tx`] in [`WithStatus`] rather than inside it, because plenty
//! of consumers (block explorers, archivers) want transactions without any
//! status semantics.
//!
//! ```text
//! nil -> confirming -> pending -> executing -> done
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::tx::Tx;
use crate::codec::primitives::{decode_u8, encode_u8};
use crate::codec::{CodecError, Decode, Encode};
use crate::config::SIZE_HINT_U8;

/// Errors from parsing a status from its text form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatusError {
    #[error("non-exhaustive pattern: status {0}")]
    NonExhaustive(String),
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Position of a transaction in its processing lifecycle.
///
/// Stored as a raw byte, so values outside the five named statuses can be
/// represented and round-trip through the binary codec. They have an empty
/// text form and cannot be parsed back from text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Status(u8);

impl Status {
    /// Unknown status, e.g. a transaction that was rejected.
    pub const NIL: Status = Status(0);

    /// Waiting for the underlying chain transaction to reach the required
    /// number of confirmations.
    pub const CONFIRMING: Status = Status(1);

    /// Validated and waiting to be included in a block.
    pub const PENDING: Status = Status(2);

    /// Included in a block that has not been executed yet.
    pub const EXECUTING: Status = Status(3);

    /// Included in an executed block. Cross-chain transactions cannot revert,
    /// so `done` says nothing about success beyond that.
    pub const DONE: Status = Status(4);

    /// The five named statuses, in lifecycle order.
    pub const ALL: [Status; 5] = [
        Self::NIL,
        Self::CONFIRMING,
        Self::PENDING,
        Self::EXECUTING,
        Self::DONE,
    ];

    pub const fn from_u8(value: u8) -> Self {
        Self(value)
    }

    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Whether this is one of the five named statuses.
    pub fn is_known(self) -> bool {
        self.0 <= Self::DONE.0
    }

    /// Text form; empty for values outside the enumeration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NIL => "nil",
            Self::CONFIRMING => "confirming",
            Self::PENDING => "pending",
            Self::EXECUTING => "executing",
            Self::DONE => "done",
            _ => "",
        }
    }
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        status.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nil" => Ok(Self::NIL),
            "confirming" => Ok(Self::CONFIRMING),
            "pending" => Ok(Self::PENDING),
            "executing" => Ok(Self::EXECUTING),
            "done" => Ok(Self::DONE),
            other => Err(StatusError::NonExhaustive(other.to_owned())),
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl Encode for Status {
    fn size_hint(&self) -> usize {
        SIZE_HINT_U8
    }

    fn encode<'a>(&self, buf: &'a mut [u8], rem: usize) -> Result<(&'a mut [u8], usize), CodecError> {
        encode_u8(self.0, buf, rem)
    }
}

impl Decode for Status {
    fn decode(buf: &[u8], rem: usize) -> Result<(Self, &[u8], usize), CodecError> {
        let (value, buf, rem) = decode_u8(buf, rem)?;
        Ok((Self(value), buf, rem))
    }
}

// ---------------------------------------------------------------------------
// WithStatus
// ---------------------------------------------------------------------------

/// A transaction paired with its current status.
///
/// Binary layout: the full [`Tx`] encoding followed by one status byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithStatus {
    pub tx: Tx,
    pub status: Status,
}

impl WithStatus {
    pub fn new(tx: Tx, status: Status) -> Self {
        Self { tx, status }
    }
}

impl Encode for WithStatus {
    fn size_hint(&self) -> usize {
        self.tx.size_hint() + self.status.size_hint()
    }

    fn encode<'a>(&self, buf: &'a mut [u8], rem: usize) -> Result<(&'a mut [u8], usize), CodecError> {
        let (buf, rem) = self.tx.encode(buf, rem)?;
        self.status.encode(buf, rem)
    }
}

impl Decode for WithStatus {
    fn decode(buf: &[u8], rem: usize) -> Result<(Self, &[u8], usize), CodecError> {
        let (tx, buf, rem) = Tx::decode(buf, rem)?;
        let (status, buf, rem) = Status::decode(buf, rem)?;
        Ok((Self { tx, status }, buf, rem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{from_bytes, to_bytes};
    use crate::pack::Typed;
    use crate::transaction::Selector;

    #[test]
    fn stringify_and_values() {
        let table = [
            (Status::NIL, "nil", 0u8),
            (Status::CONFIRMING, "confirming", 1),
            (Status::PENDING, "pending", 2),
            (Status::EXECUTING, "executing", 3),
            (Status::DONE, "done", 4),
            (Status::from_u8(255), "", 255),
        ];
        for (status, text, value) in table {
            assert_eq!(status.to_string(), text);
            assert_eq!(u8::from(status), value);
        }
    }

    #[test]
    fn named_statuses_parse_back() {
        for status in Status::ALL {
            assert!(status.is_known());
            assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_text_is_rejected() {
        let err = "finalised".parse::<Status>().unwrap_err();
        assert_eq!(err.to_string(), "non-exhaustive pattern: status finalised");
        assert!("".parse::<Status>().is_err());
        assert!("Done".parse::<Status>().is_err());
    }

    #[test]
    fn out_of_range_serialises_empty_and_fails_to_parse() {
        let status = Status::from_u8(9);
        assert!(!status.is_known());
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#""""#);
        assert!(serde_json::from_str::<Status>(&json).is_err());
    }

    #[test]
    fn out_of_range_survives_binary_roundtrip() {
        let status = Status::from_u8(200);
        let bytes = to_bytes(&status).unwrap();
        assert_eq!(bytes, vec![200]);
        assert_eq!(from_bytes::<Status>(&bytes).unwrap(), status);
    }

    #[test]
    fn with_status_layout() {
        let tx = Tx::new(Selector::from("BTC/toEthereum"), Typed::new()).unwrap();
        let with = WithStatus::new(tx.clone(), Status::EXECUTING);
        let bytes = to_bytes(&with).unwrap();
        assert_eq!(bytes.len(), tx.size_hint() + 1);
        assert_eq!(bytes.last(), Some(&3));
        assert_eq!(from_bytes::<WithStatus>(&bytes).unwrap(), with);
    }

    #[test]
    fn with_status_json_shape() {
        let tx = Tx::new(Selector::from("BTC/toEthereum"), Typed::new()).unwrap();
        let with = WithStatus::new(tx, Status::DONE);
        let json: serde_json::Value = serde_json::to_value(&with).unwrap();
        assert_eq!(json["status"], "done");
        assert_eq!(json["tx"]["selector"], "BTC/toEthereum");
        let back: WithStatus = serde_json::from_value(json).unwrap();
        assert_eq!(back, with);
    }
}

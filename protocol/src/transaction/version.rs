//! Transaction format versions.
//!
//! The version tags the wire format of the fields that follow it and is part
//! of the hashed preimage. It travels as a length-prefixed string (`"0"`,
//! `"1"`), and anything unrecognised collapses to [`Version::Unknown`],
//! which travels as the empty string.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::codec::primitives::{decode_str_ref, encode_str};
use crate::codec::{CodecError, Decode, Encode};
use crate::config::size_hint_bytes;

/// Wire format revision of a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Version {
    /// Any tag this build does not recognise, including the empty string.
    #[default]
    Unknown,
    V0,
    V1,
}

impl Version {
    /// The version [`Tx::new`](super::Tx::new) stamps on new transactions.
    pub const CURRENT: Version = Version::V1;

    /// The text form written to the wire and to JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "",
            Self::V0 => "0",
            Self::V1 => "1",
        }
    }

    /// Maps a text tag to a version. Never fails.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "0" => Self::V0,
            "1" => Self::V1,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

impl Encode for Version {
    fn size_hint(&self) -> usize {
        size_hint_bytes(self.as_str().len())
    }

    fn encode<'a>(&self, buf: &'a mut [u8], rem: usize) -> Result<(&'a mut [u8], usize), CodecError> {
        encode_str(self.as_str(), buf, rem)
    }
}

impl Decode for Version {
    fn decode(buf: &[u8], rem: usize) -> Result<(Self, &[u8], usize), CodecError> {
        let (tag, buf, rem) = decode_str_ref(buf, rem)?;
        Ok((Self::from_tag(tag), buf, rem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{from_bytes, to_bytes};

    #[test]
    fn stringify() {
        let table = [
            (Version::V0, "0"),
            (Version::V1, "1"),
            (Version::from_tag("2"), ""),
            (Version::from_tag("3"), ""),
            (Version::from_tag(""), ""),
        ];
        for (version, expected) in table {
            assert_eq!(version.to_string(), expected);
        }
    }

    #[test]
    fn current_is_v1() {
        assert_eq!(Version::CURRENT, Version::V1);
        assert_eq!(Version::default(), Version::Unknown);
    }

    #[test]
    fn binary_layout_and_roundtrip() {
        assert_eq!(to_bytes(&Version::V1).unwrap(), vec![0, 0, 0, 1, b'1']);
        assert_eq!(to_bytes(&Version::Unknown).unwrap(), vec![0, 0, 0, 0]);
        for v in [Version::Unknown, Version::V0, Version::V1] {
            let bytes = to_bytes(&v).unwrap();
            assert_eq!(bytes.len(), v.size_hint());
            assert_eq!(from_bytes::<Version>(&bytes).unwrap(), v);
        }
    }

    #[test]
    fn unrecognised_wire_tag_decodes_as_unknown() {
        let bytes = to_bytes("7").unwrap();
        assert_eq!(from_bytes::<Version>(&bytes).unwrap(), Version::Unknown);
    }

    #[test]
    fn json_roundtrip() {
        assert_eq!(serde_json::to_string(&Version::V0).unwrap(), r#""0""#);
        let v: Version = serde_json::from_str(r#""1""#).unwrap();
        assert_eq!(v, Version::V1);
        let v: Version = serde_json::from_str(r#""9""#).unwrap();
        assert_eq!(v, Version::Unknown);
    }
}

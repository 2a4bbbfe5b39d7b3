//! [`Typed`]: an ordered record of named values.
//!
//! This is the payload type for transaction inputs and outputs. It carries
//! its own field names and kinds, so a decoder never needs a schema.

use serde::{Deserialize, Serialize};

use super::value::{prealloc_len, Value, MIN_VALUE_SIZE};
use crate::codec::primitives::{decode_len, decode_string, encode_len, encode_str};
use crate::codec::{CodecError, Decode, Encode};
use crate::config::{size_hint_bytes, LENGTH_PREFIX_SIZE, MAX_TYPED_DEPTH};

/// Smallest possible encoded field: an empty name plus the smallest value.
const MIN_FIELD_SIZE: usize = LENGTH_PREFIX_SIZE + MIN_VALUE_SIZE;

/// One named entry of a [`Typed`] record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

/// An ordered list of named, self-describing values.
///
/// Field order is significant: it is preserved by both encodings and feeds
/// into transaction hashes. The default value has no fields.
///
/// # Examples
///
/// ```
/// use relaytx_protocol::pack::{Typed, Value};
///
/// let input = Typed::new()
///     .with("txindex", 0u32)
///     .with("to", "0x8ac7...");
/// assert_eq!(input.get("txindex"), Some(&Value::U32(0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Typed {
    fields: Vec<Field>,
}

impl Typed {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field and returns the record, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    /// Appends a field.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Returns the value of the first field called `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub(crate) fn decode_at_depth(
        buf: &[u8],
        rem: usize,
        depth: usize,
    ) -> Result<(Self, &[u8], usize), CodecError> {
        if depth > MAX_TYPED_DEPTH {
            return Err(CodecError::DepthExceeded {
                max: MAX_TYPED_DEPTH,
            });
        }
        let (count, mut buf, mut rem) = decode_len(buf, rem)?;
        let mut fields = Vec::with_capacity(prealloc_len(count, buf, MIN_FIELD_SIZE));
        for _ in 0..count {
            let (name, b, r) = decode_string(buf, rem)?;
            let (value, b, r) = Value::decode_at_depth(b, r, depth)?;
            fields.push(Field { name, value });
            buf = b;
            rem = r;
        }
        Ok((Self { fields }, buf, rem))
    }
}

impl FromIterator<(String, Value)> for Typed {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| Field { name, value })
                .collect(),
        }
    }
}

impl Encode for Typed {
    fn size_hint(&self) -> usize {
        LENGTH_PREFIX_SIZE
            + self
                .fields
                .iter()
                .map(|field| size_hint_bytes(field.name.len()) + field.value.size_hint())
                .sum::<usize>()
    }

    fn encode<'a>(&self, buf: &'a mut [u8], rem: usize) -> Result<(&'a mut [u8], usize), CodecError> {
        let (mut buf, mut rem) = encode_len(self.fields.len(), buf, rem)?;
        for field in &self.fields {
            (buf, rem) = encode_str(&field.name, buf, rem)?;
            (buf, rem) = field.value.encode(buf, rem)?;
        }
        Ok((buf, rem))
    }
}

impl Decode for Typed {
    fn decode(buf: &[u8], rem: usize) -> Result<(Self, &[u8], usize), CodecError> {
        Self::decode_at_depth(buf, rem, 0)
    }
}

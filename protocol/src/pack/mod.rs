//! # Typed Values
//!
//! Self-describing values used for transaction inputs and outputs. A
//! [`Typed`] record is an ordered list of named [`Value`]s, each carrying its
//! own kind tag, so records can be hashed, stored and decoded without any
//! external schema.
//!
//! Both types implement the bounded [`Encode`](crate::codec::Encode) /
//! [`Decode`](crate::codec::Decode) contract. Decoding caps nesting depth
//! at [`MAX_TYPED_DEPTH`](crate::config::MAX_TYPED_DEPTH) and never reserves
//! more elements than the remaining quota could hold.

pub mod typed;
pub mod value;

pub use typed::{Field, Typed};
pub use value::Value;

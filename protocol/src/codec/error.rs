//! Error types for the bounded codec.
//!
//! Every encode and decode in the crate returns a [`CodecError`] on failure.
//! Running out of buffer and running out of quota are distinct variants.

use thiserror::Error;

/// Failures raised while encoding into, or decoding from, a bounded buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The remaining memory quota cannot cover the bytes this step needs.
    /// For length-prefixed reads this fires on the claimed length, before
    /// anything is allocated.
    #[error("memory quota exceeded: need {need} bytes, {remaining} remaining")]
    QuotaExceeded {
        /// Bytes the step wanted to consume.
        need: usize,
        /// Quota left when the step was attempted.
        remaining: usize,
    },

    /// The physical buffer has fewer bytes left than this step needs.
    #[error("buffer too small: need {need} bytes, {available} available")]
    BufferTooSmall {
        /// Bytes the step wanted to read or write.
        need: usize,
        /// Bytes left in the buffer.
        available: usize,
    },

    /// A variable-length field is too long to describe with a `u32` prefix.
    #[error("length {len} does not fit in a u32 length prefix")]
    LengthOverflow {
        /// The offending length.
        len: usize,
    },

    /// A string field held bytes that are not valid UTF-8.
    #[error("string field is not valid utf-8")]
    InvalidUtf8,

    /// A bool field held something other than 0 or 1.
    #[error("invalid bool byte {0:#04x}")]
    InvalidBool(u8),

    /// A typed value carried a kind tag this codec does not know.
    #[error("unknown typed-value kind {0:#04x}")]
    UnknownKind(u8),

    /// Structs or lists nested past the decoder's depth limit.
    #[error("typed value nested deeper than {max} levels")]
    DepthExceeded {
        /// The configured limit.
        max: usize,
    },
}

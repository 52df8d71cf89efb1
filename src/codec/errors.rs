//! Codec error types
//!
//! A value that cannot be encoded or decoded for its declared type is fatal
//! for that row and propagated, never silently dropped.

use thiserror::Error;

use crate::types::TypeTag;

/// Errors raised by the opaque and order-preserving codecs.
#[derive(Debug, Clone, Error)]
pub enum CodecError {
    #[error("cannot encode {actual} value as {expected}")]
    Encode {
        expected: TypeTag,
        actual: &'static str,
    },
    #[error("cannot decode {len} byte(s) as {expected}: {reason}")]
    Decode {
        expected: TypeTag,
        len: usize,
        reason: String,
    },
}

impl CodecError {
    /// Create an encode error for a value of the wrong runtime variant.
    pub fn encode(expected: TypeTag, actual: &'static str) -> Self {
        CodecError::Encode { expected, actual }
    }

    /// Create a decode error.
    pub fn decode(expected: TypeTag, bytes: &[u8], reason: impl Into<String>) -> Self {
        CodecError::Decode {
            expected,
            len: bytes.len(),
            reason: reason.into(),
        }
    }
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

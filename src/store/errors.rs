//! Store error types
//!
//! Backend failures are wrapped and surfaced to the caller; nothing is
//! retried silently except the single create-table-then-retry path on
//! first writes, which lives in the mutation translator.

use thiserror::Error;

use crate::codec::CodecError;

/// Errors raised by store connections, cursors, writers, and the operator
/// chain executing inside the store's scan pipeline.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table '{0}' not found")]
    TableNotFound(String),
    #[error("mutation rejected: {0}")]
    MutationRejected(String),
    #[error("store connection failure: {0}")]
    Connection(String),
    #[error("scan failure: {0}")]
    Scan(String),
    #[error("invalid operator options: {0}")]
    OperatorOptions(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

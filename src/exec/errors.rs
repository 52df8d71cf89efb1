//! Execution error types
//!
//! One wrapper over every tier's failure mode. Translation errors surface
//! before execution starts; backend errors surface mid-stream; a lifecycle
//! misuse is its own variant.

use thiserror::Error;

use crate::codec::CodecError;
use crate::planner::PlanError;
use crate::schema::MappingError;
use crate::store::StoreError;

/// Any failure an execution can report.
#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Lifecycle misuse, such as reading before execute or after close.
    #[error("invalid execution state: {0}")]
    InvalidState(String),
}

/// Result type for execution operations.
pub type TranslatorResult<T> = Result<T, TranslatorError>;

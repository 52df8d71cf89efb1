//! Planner error types
//!
//! These are translation errors: clause shapes this backend cannot express.
//! They surface before execution starts; nothing is retried.
//!
//! Error codes:
//! - RL_PLAN_BULK_UPDATE_UNSUPPORTED (REJECT)
//! - RL_PLAN_NON_LITERAL_ASSIGNMENT (REJECT)
//! - RL_PLAN_ROWID_REASSIGNMENT (REJECT)
//! - RL_PLAN_KEY_ENCODING (REJECT)
//! - RL_PLAN_INTERNAL (ERROR)

use std::fmt;

use crate::codec::CodecError;

/// Planner-specific error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanErrorCode {
    /// Parameterized bulk update with no literal predicate
    RlPlanBulkUpdateUnsupported,
    /// SET clause with a non-literal right-hand side
    RlPlanNonLiteralAssignment,
    /// Attempt to reassign the row-id column
    RlPlanRowidReassignment,
    /// A boundary value could not be key-encoded
    RlPlanKeyEncoding,
    /// Projected or filtered column the mapping does not define
    RlPlanUnknownColumn,
    /// Operator descriptor construction failed
    RlPlanInternal,
}

impl PlanErrorCode {
    /// Returns the string code.
    pub fn code(&self) -> &'static str {
        match self {
            PlanErrorCode::RlPlanBulkUpdateUnsupported => "RL_PLAN_BULK_UPDATE_UNSUPPORTED",
            PlanErrorCode::RlPlanNonLiteralAssignment => "RL_PLAN_NON_LITERAL_ASSIGNMENT",
            PlanErrorCode::RlPlanRowidReassignment => "RL_PLAN_ROWID_REASSIGNMENT",
            PlanErrorCode::RlPlanKeyEncoding => "RL_PLAN_KEY_ENCODING",
            PlanErrorCode::RlPlanUnknownColumn => "RL_PLAN_UNKNOWN_COLUMN",
            PlanErrorCode::RlPlanInternal => "RL_PLAN_INTERNAL",
        }
    }
}

impl fmt::Display for PlanErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Planner error with context.
#[derive(Debug, Clone)]
pub struct PlanError {
    code: PlanErrorCode,
    message: String,
}

impl PlanError {
    /// Create a bulk update unsupported error.
    pub fn bulk_update_unsupported() -> Self {
        Self {
            code: PlanErrorCode::RlPlanBulkUpdateUnsupported,
            message: "parameterized bulk updates are not supported; \
                      this backend can only update rows it can locate by scanning"
                .into(),
        }
    }

    /// Create a non-literal assignment error.
    pub fn non_literal_assignment(column: &str) -> Self {
        Self {
            code: PlanErrorCode::RlPlanNonLiteralAssignment,
            message: format!(
                "SET clause for '{}' is not a literal; only literal values are supported",
                column
            ),
        }
    }

    /// Create a rowid reassignment error.
    pub fn rowid_reassignment(column: &str) -> Self {
        Self {
            code: PlanErrorCode::RlPlanRowidReassignment,
            message: format!("the row-id column '{}' cannot be reassigned", column),
        }
    }

    /// Create a key encoding error from a codec failure.
    pub fn key_encoding(err: CodecError) -> Self {
        Self {
            code: PlanErrorCode::RlPlanKeyEncoding,
            message: err.to_string(),
        }
    }

    /// Create an internal planner error.
    pub fn internal(reason: impl Into<String>) -> Self {
        Self {
            code: PlanErrorCode::RlPlanInternal,
            message: reason.into(),
        }
    }

    /// Returns the error code.
    pub fn code(&self) -> PlanErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<crate::schema::MappingError> for PlanError {
    fn from(err: crate::schema::MappingError) -> Self {
        Self {
            code: PlanErrorCode::RlPlanUnknownColumn,
            message: err.message().to_string(),
        }
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for PlanError {}

/// Result type for planner operations.
pub type PlanResult<T> = Result<T, PlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PlanErrorCode::RlPlanBulkUpdateUnsupported.code(),
            "RL_PLAN_BULK_UPDATE_UNSUPPORTED"
        );
        let err = PlanError::rowid_reassignment("id");
        assert!(format!("{}", err).contains("RL_PLAN_ROWID_REASSIGNMENT"));
        assert!(format!("{}", err).contains("id"));
    }
}

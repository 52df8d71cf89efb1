//! Mapping error types
//!
//! Error codes:
//! - RL_MAPPING_DUPLICATE_SLOT (REJECT)
//! - RL_MAPPING_UNKNOWN_COLUMN (REJECT)
//! - RL_MAPPING_NO_ROW_KEY (REJECT)
//! - RL_MAPPING_COMPOSITE_KEY (REJECT)

use std::fmt;

/// Mapping-specific error codes.
///
/// All mapping errors reject the definition; none are runtime failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingErrorCode {
    /// Two VALUE-slot columns bound to the same (family, qualifier)
    RlMappingDuplicateSlot,
    /// Reference to a column the mapping does not define
    RlMappingUnknownColumn,
    /// No rowid-mapped column and no primary key to derive the row key from
    RlMappingNoRowKey,
    /// Primary key spans more than one column; the row key holds exactly one
    RlMappingCompositeKey,
}

impl MappingErrorCode {
    /// Returns the string code.
    pub fn code(&self) -> &'static str {
        match self {
            MappingErrorCode::RlMappingDuplicateSlot => "RL_MAPPING_DUPLICATE_SLOT",
            MappingErrorCode::RlMappingUnknownColumn => "RL_MAPPING_UNKNOWN_COLUMN",
            MappingErrorCode::RlMappingNoRowKey => "RL_MAPPING_NO_ROW_KEY",
            MappingErrorCode::RlMappingCompositeKey => "RL_MAPPING_COMPOSITE_KEY",
        }
    }
}

impl fmt::Display for MappingErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Mapping error with context.
#[derive(Debug, Clone)]
pub struct MappingError {
    code: MappingErrorCode,
    message: String,
}

impl MappingError {
    /// Create a duplicate slot error.
    pub fn duplicate_slot(family: &str, qualifier: Option<&str>) -> Self {
        Self {
            code: MappingErrorCode::RlMappingDuplicateSlot,
            message: format!(
                "more than one VALUE-slot column bound to ({}, {})",
                family,
                qualifier.unwrap_or("<none>")
            ),
        }
    }

    /// Create an unknown column error.
    pub fn unknown_column(name: impl Into<String>) -> Self {
        let n = name.into();
        Self {
            code: MappingErrorCode::RlMappingUnknownColumn,
            message: format!("column '{}' is not defined in the table mapping", n),
        }
    }

    /// Create a missing row key error.
    pub fn no_row_key(table: impl Into<String>) -> Self {
        Self {
            code: MappingErrorCode::RlMappingNoRowKey,
            message: format!(
                "table '{}' has no rowid-mapped column and no primary key",
                table.into()
            ),
        }
    }

    /// Create a composite primary key error.
    pub fn composite_key(table: impl Into<String>, columns: usize) -> Self {
        Self {
            code: MappingErrorCode::RlMappingCompositeKey,
            message: format!(
                "table '{}' declares a {}-column primary key; the row key maps exactly one column",
                table.into(),
                columns
            ),
        }
    }

    /// Returns the error code.
    pub fn code(&self) -> MappingErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for MappingError {}

/// Result type for mapping operations.
pub type MappingResult<T> = Result<T, MappingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            MappingErrorCode::RlMappingDuplicateSlot.code(),
            "RL_MAPPING_DUPLICATE_SLOT"
        );
        let err = MappingError::unknown_column("missing");
        assert!(format!("{}", err).contains("RL_MAPPING_UNKNOWN_COLUMN"));
        assert!(format!("{}", err).contains("missing"));
    }
}

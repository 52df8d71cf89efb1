//! Column naming pattern for metadata discovery
//!
//! When virtual table metadata is imported from an existing store layout,
//! relational column names are derived from a configurable pattern over
//! `{family}`, `{qualifier}`, and `{rowid}` tokens. The pattern is consumed
//! only at discovery time; execution always works from the resolved
//! [`super::TableMapping`].

use super::mapping::ROWID_COLUMN;

const FAMILY_TOKEN: &str = "{family}";
const QUALIFIER_TOKEN: &str = "{qualifier}";
const ROWID_TOKEN: &str = "{rowid}";

/// A column naming pattern, e.g. `"{family}_{qualifier}"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNamePattern {
    pattern: String,
}

impl Default for ColumnNamePattern {
    /// The default pattern joins family and qualifier with an underscore.
    fn default() -> Self {
        Self {
            pattern: format!("{}_{}", FAMILY_TOKEN, QUALIFIER_TOKEN),
        }
    }
}

impl ColumnNamePattern {
    /// Creates a pattern from a raw template string.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Derives a relational column name for a stored cell location.
    ///
    /// A location with no qualifier collapses to the family name alone.
    pub fn column_name(&self, family: &str, qualifier: Option<&str>) -> String {
        match qualifier {
            Some(q) => self
                .pattern
                .replace(FAMILY_TOKEN, family)
                .replace(QUALIFIER_TOKEN, q),
            None => family.to_string(),
        }
    }

    /// Derives the name of the synthetic row-key column.
    pub fn rowid_name(&self) -> String {
        if self.pattern.contains(ROWID_TOKEN) {
            self.pattern
                .replace(ROWID_TOKEN, ROWID_COLUMN)
                .replace(FAMILY_TOKEN, "")
                .replace(QUALIFIER_TOKEN, "")
        } else {
            ROWID_COLUMN.to_string()
        }
    }
}

//! Column-to-storage bindings
//!
//! Each relational column is bound to `{family, qualifier?, value slot}`.
//! The synthetic `rowid` column is always present and bound to the row key;
//! it never occupies a (family, qualifier) slot.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::TypeTag;

use super::errors::{MappingError, MappingResult};

/// Name of the synthetic row-key column.
pub const ROWID_COLUMN: &str = "rowid";

/// Where a column's decoded value lives within a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueSlot {
    /// The cell value holds the encoded column value
    Value,
    /// The cell qualifier itself holds the encoded column value
    Qualifier,
}

/// Storage location descriptor for one relational column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnBinding {
    /// Column family
    pub family: String,
    /// Fixed qualifier, absent for QUALIFIER-slot columns
    pub qualifier: Option<String>,
    /// Which part of the cell carries the value
    pub slot: ValueSlot,
}

impl ColumnBinding {
    /// Binding for a VALUE-slot column under a fixed qualifier.
    pub fn value(family: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            qualifier: Some(qualifier.into()),
            slot: ValueSlot::Value,
        }
    }

    /// Binding for a VALUE-slot column addressed by family alone.
    pub fn family_only(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            qualifier: None,
            slot: ValueSlot::Value,
        }
    }

    /// Binding for a column whose value is encoded into the qualifier.
    pub fn in_qualifier(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            qualifier: None,
            slot: ValueSlot::Qualifier,
        }
    }
}

/// One relational column: name, declared type, storage binding.
///
/// A column with no binding is the synthetic rowid column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Relational column name
    pub name: String,
    /// Declared relational type
    pub tag: TypeTag,
    /// Storage binding; None binds the column to the row key
    pub binding: Option<ColumnBinding>,
}

impl ColumnDef {
    /// Defines a column stored at the given binding.
    pub fn new(name: impl Into<String>, tag: TypeTag, binding: ColumnBinding) -> Self {
        Self {
            name: name.into(),
            tag,
            binding: Some(binding),
        }
    }

    /// Defines a column bound to the row key.
    pub fn row_key(name: impl Into<String>, tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            tag,
            binding: None,
        }
    }

    /// Returns true if this column is bound to the row key.
    pub fn is_row_key(&self) -> bool {
        self.binding.is_none()
    }
}

/// Immutable per-table mapping shared by the planner, assembler, and
/// mutation translator for the duration of one execution.
#[derive(Debug, Clone)]
pub struct TableMapping {
    table: String,
    columns: Vec<ColumnDef>,
    primary_key: Vec<String>,
    by_name: HashMap<String, usize>,
}

impl TableMapping {
    /// Builds and validates a table mapping.
    ///
    /// `primary_key` names the single column the engine declares as the key;
    /// if no column is explicitly row-key-bound, that column is bound to
    /// the row key. A multi-column primary key is rejected, since the row
    /// key encodes one column and later key columns would not distinguish
    /// rows.
    pub fn new(
        table: impl Into<String>,
        mut columns: Vec<ColumnDef>,
        primary_key: Vec<String>,
    ) -> MappingResult<Self> {
        let table = table.into();

        // Validate the VALUE-slot uniqueness invariant.
        let mut slots: HashSet<(String, Option<String>)> = HashSet::new();
        for col in &columns {
            if let Some(binding) = &col.binding {
                if binding.slot == ValueSlot::Value {
                    let key = (binding.family.clone(), binding.qualifier.clone());
                    if !slots.insert(key) {
                        return Err(MappingError::duplicate_slot(
                            &binding.family,
                            binding.qualifier.as_deref(),
                        ));
                    }
                }
            }
        }

        // The row key encodes exactly one column; a multi-column primary key
        // would collide rows differing only in the later key columns.
        if primary_key.len() > 1 {
            return Err(MappingError::composite_key(table, primary_key.len()));
        }
        for pk in &primary_key {
            if !columns.iter().any(|c| &c.name == pk) {
                return Err(MappingError::unknown_column(pk.clone()));
            }
        }

        let has_row_key = columns.iter().any(|c| c.is_row_key());
        if !has_row_key {
            // Bind the first primary-key column to the row key.
            match primary_key.first() {
                Some(pk) => {
                    for col in columns.iter_mut() {
                        if &col.name == pk {
                            col.binding = None;
                        }
                    }
                }
                None => return Err(MappingError::no_row_key(table)),
            }
        }

        let by_name = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();

        Ok(Self {
            table,
            columns,
            primary_key,
            by_name,
        })
    }

    /// Returns the table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns all column definitions in declaration order.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Looks up a column by relational name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.by_name.get(name).map(|&i| &self.columns[i])
    }

    /// Returns the declared primary-key column names.
    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    /// Returns the column bound to the row key.
    ///
    /// Construction guarantees exactly one exists.
    pub fn row_key_column(&self) -> &ColumnDef {
        self.columns
            .iter()
            .find(|c| c.is_row_key())
            .unwrap_or(&self.columns[0])
    }

    /// Returns true if `name` addresses the row key, either as the synthetic
    /// `rowid` column or as the row-key-bound column.
    pub fn is_row_key_name(&self, name: &str) -> bool {
        name == ROWID_COLUMN || self.row_key_column().name == name
    }
}

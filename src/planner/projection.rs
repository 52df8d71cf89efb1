//! Column projection with (family, qualifier) lookup
//!
//! The planner records projected columns as an ordered list plus an index
//! keyed by `(family, qualifier)`, falling back to `family` alone when a
//! column has no fixed qualifier. The row assembler resolves every scanned
//! cell through this index.

use std::collections::HashMap;

use crate::schema::{ColumnBinding, MappingError, MappingResult, TableMapping, ROWID_COLUMN};
use crate::types::TypeTag;

/// One projected column with its declared type and storage binding.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedColumn {
    /// Relational column name, the key in assembled rows
    pub name: String,
    /// Declared relational type
    pub tag: TypeTag,
    /// Storage binding; None for the row-key column
    pub binding: Option<ColumnBinding>,
}

/// Ordered projection over one table mapping.
#[derive(Debug, Clone)]
pub struct Projection {
    columns: Vec<ProjectedColumn>,
    index: HashMap<(String, Option<String>), usize>,
    row_key: Option<usize>,
}

impl Projection {
    /// Builds a projection for the named columns, in order.
    ///
    /// The synthetic `rowid` name projects the row-key column under the
    /// requested name.
    pub fn build(mapping: &TableMapping, names: &[String]) -> MappingResult<Self> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let def = match mapping.column(name) {
                Some(def) => def,
                None if name == ROWID_COLUMN => mapping.row_key_column(),
                None => return Err(MappingError::unknown_column(name.clone())),
            };
            columns.push(ProjectedColumn {
                name: name.clone(),
                tag: def.tag,
                binding: def.binding.clone(),
            });
        }
        Ok(Self::from_columns(columns))
    }

    /// Builds a projection covering every column of the mapping.
    pub fn all_columns(mapping: &TableMapping) -> Self {
        let columns = mapping
            .columns()
            .iter()
            .map(|def| ProjectedColumn {
                name: def.name.clone(),
                tag: def.tag,
                binding: def.binding.clone(),
            })
            .collect();
        Self::from_columns(columns)
    }

    fn from_columns(columns: Vec<ProjectedColumn>) -> Self {
        let mut index = HashMap::new();
        let mut row_key = None;
        for (i, col) in columns.iter().enumerate() {
            match &col.binding {
                Some(binding) => {
                    index.insert((binding.family.clone(), binding.qualifier.clone()), i);
                }
                None => row_key = Some(i),
            }
        }
        Self {
            columns,
            index,
            row_key,
        }
    }

    /// Returns the projected columns in output order.
    pub fn columns(&self) -> &[ProjectedColumn] {
        &self.columns
    }

    /// Resolves a cell location to a projected column: exact
    /// `(family, qualifier)` first, then `family` alone.
    pub fn resolve(&self, family: &str, qualifier: Option<&str>) -> Option<&ProjectedColumn> {
        if qualifier.is_some() {
            if let Some(&i) = self
                .index
                .get(&(family.to_string(), qualifier.map(str::to_string)))
            {
                return Some(&self.columns[i]);
            }
        }
        self.index
            .get(&(family.to_string(), None))
            .map(|&i| &self.columns[i])
    }

    /// Returns the projected row-key column, if the projection includes it.
    pub fn row_key_column(&self) -> Option<&ProjectedColumn> {
        self.row_key.map(|i| &self.columns[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnBinding, ColumnDef, TableMapping};

    fn mapping() -> TableMapping {
        TableMapping::new(
            "t",
            vec![
                ColumnDef::row_key("id", TypeTag::String),
                ColumnDef::new("name", TypeTag::String, ColumnBinding::value("cf", "name")),
                ColumnDef::new("note", TypeTag::String, ColumnBinding::in_qualifier("meta")),
            ],
            vec!["id".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_exact_then_family_fallback() {
        let p = Projection::all_columns(&mapping());
        let byq = p.resolve("cf", Some("name")).unwrap();
        assert_eq!(byq.name, "name");
        // QUALIFIER-slot column resolves through the family alone.
        let byfam = p.resolve("meta", Some("anything")).unwrap();
        assert_eq!(byfam.name, "note");
        assert!(p.resolve("cf", Some("other")).is_none());
    }

    #[test]
    fn test_projection_order_and_row_key() {
        let p = Projection::build(&mapping(), &["name".into(), "id".into()]).unwrap();
        assert_eq!(p.columns()[0].name, "name");
        assert_eq!(p.columns()[1].name, "id");
        assert_eq!(p.row_key_column().unwrap().name, "id");
    }

    #[test]
    fn test_unknown_column_rejected() {
        let err = Projection::build(&mapping(), &["ghost".into()]);
        assert!(err.is_err());
    }
}

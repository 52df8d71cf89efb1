//! Assembled relational rows

use std::collections::BTreeMap;

use crate::types::TypedValue;

/// One relational row, keyed by resolved column name.
///
/// Columns the scan produced no cell for read back as Null.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: BTreeMap<String, TypedValue>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column value.
    pub fn set(&mut self, column: impl Into<String>, value: TypedValue) {
        self.values.insert(column.into(), value);
    }

    /// Returns a column value; absent columns are Null.
    pub fn get(&self, column: &str) -> &TypedValue {
        self.values.get(column).unwrap_or(&TypedValue::Null)
    }

    /// Returns true if no column was populated.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Projects the row into an ordered value list.
    pub fn into_ordered(mut self, column_order: &[String]) -> Vec<TypedValue> {
        column_order
            .iter()
            .map(|name| self.values.remove(name).unwrap_or(TypedValue::Null))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_columns_are_null() {
        let mut row = Row::new();
        row.set("a", TypedValue::Int(1));
        assert_eq!(row.get("a"), &TypedValue::Int(1));
        assert_eq!(row.get("b"), &TypedValue::Null);
    }

    #[test]
    fn test_ordered_projection() {
        let mut row = Row::new();
        row.set("b", TypedValue::Int(2));
        row.set("a", TypedValue::Int(1));
        let ordered = row.into_ordered(&["a".into(), "b".into(), "c".into()]);
        assert_eq!(
            ordered,
            vec![TypedValue::Int(1), TypedValue::Int(2), TypedValue::Null]
        );
    }
}

//! Residual filter operator
//!
//! Embeds the minimal predicate evaluator plus the resolved column
//! metadata, buffers one row's cells at a time via the row-boundary merge
//! join, and only advances its externally visible cursor past rows the
//! predicate accepts.

use std::collections::VecDeque;

use crate::planner::Filter;
use crate::schema::ColumnDef;
use crate::store::{Cell, CellCursor, StoreError, StoreResult};

use super::descriptor::{options, OperatorDescriptor};
use super::eval::evaluate;
use super::rowbuf::{decode_flat_row, RowReader};

pub(crate) struct ResidualFilterOperator {
    inner: Box<dyn CellCursor>,
    filter: Filter,
    columns: Vec<ColumnDef>,
    reader: RowReader,
    accepted: VecDeque<Cell>,
}

impl ResidualFilterOperator {
    /// Rebuilds the operator from its descriptor options alone.
    pub fn from_descriptor(
        descriptor: &OperatorDescriptor,
        inner: Box<dyn CellCursor>,
    ) -> StoreResult<Self> {
        let filter_json = descriptor
            .option(options::FILTER)
            .ok_or_else(|| StoreError::OperatorOptions("residual filter missing".into()))?;
        let filter: Filter = serde_json::from_str(filter_json)
            .map_err(|e| StoreError::OperatorOptions(e.to_string()))?;
        let columns_json = descriptor
            .option(options::COLUMNS)
            .ok_or_else(|| StoreError::OperatorOptions("column metadata missing".into()))?;
        let columns: Vec<ColumnDef> = serde_json::from_str(columns_json)
            .map_err(|e| StoreError::OperatorOptions(e.to_string()))?;
        Ok(Self {
            inner,
            filter,
            columns,
            reader: RowReader::default(),
            accepted: VecDeque::new(),
        })
    }
}

impl CellCursor for ResidualFilterOperator {
    fn next_cell(&mut self) -> StoreResult<Option<Cell>> {
        loop {
            if let Some(cell) = self.accepted.pop_front() {
                return Ok(Some(cell));
            }
            match self.reader.next_row(self.inner.as_mut())? {
                None => return Ok(None),
                Some(cells) => {
                    let row = decode_flat_row(&cells, &self.columns)?;
                    if evaluate(&self.filter, &row) {
                        self.accepted.extend(cells);
                    }
                }
            }
        }
    }

    fn seek(&mut self, row_key: &[u8]) -> StoreResult<()> {
        self.accepted.clear();
        self.reader.reset();
        self.inner.seek(row_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnBinding;
    use crate::types::{TypeTag, TypedValue};

    struct Cells(Vec<Cell>, usize);

    impl CellCursor for Cells {
        fn next_cell(&mut self) -> StoreResult<Option<Cell>> {
            let c = self.0.get(self.1).cloned();
            if c.is_some() {
                self.1 += 1;
            }
            Ok(c)
        }

        fn seek(&mut self, row_key: &[u8]) -> StoreResult<()> {
            self.1 = self
                .0
                .iter()
                .position(|c| c.row.as_slice() >= row_key)
                .unwrap_or(self.0.len());
            Ok(())
        }
    }

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::row_key("id", TypeTag::String),
            ColumnDef::new("name", TypeTag::String, ColumnBinding::value("cf", "name")),
        ]
    }

    fn name_cell(row: &[u8], name: &str) -> Cell {
        Cell::new(row, "cf", &b"name"[..], name.as_bytes())
    }

    fn build(filter: Filter, cells: Vec<Cell>) -> ResidualFilterOperator {
        let descriptor = OperatorDescriptor::residual_filter(&filter, &columns()).unwrap();
        ResidualFilterOperator::from_descriptor(&descriptor, Box::new(Cells(cells, 0))).unwrap()
    }

    #[test]
    fn test_rows_filtered_whole() {
        let cells = vec![
            name_cell(b"1", "Alice"),
            name_cell(b"2", "Bob"),
            name_cell(b"3", "Anna"),
        ];
        let mut op = build(Filter::like("name", "A%"), cells);
        let mut rows = Vec::new();
        while let Some(cell) = op.next_cell().unwrap() {
            rows.push(cell.row);
        }
        assert_eq!(rows, vec![b"1".to_vec(), b"3".to_vec()]);
    }

    #[test]
    fn test_filter_may_reference_row_key() {
        let cells = vec![name_cell(b"1", "Alice"), name_cell(b"2", "Bob")];
        let mut op = build(Filter::eq("id", TypedValue::String("2".into())), cells);
        let cell = op.next_cell().unwrap().unwrap();
        assert_eq!(cell.row, b"2".to_vec());
        assert!(op.next_cell().unwrap().is_none());
    }

    #[test]
    fn test_reseek_resets_row_state() {
        let cells = vec![
            name_cell(b"1", "Alice"),
            name_cell(b"2", "Ada"),
            name_cell(b"3", "Ann"),
        ];
        let mut op = build(Filter::like("name", "A%"), cells);
        let first = op.next_cell().unwrap().unwrap();
        assert_eq!(first.row, b"1".to_vec());
        op.seek(b"3").unwrap();
        let next = op.next_cell().unwrap().unwrap();
        assert_eq!(next.row, b"3".to_vec());
    }

    #[test]
    fn test_missing_options_rejected() {
        let descriptor = OperatorDescriptor::row_count();
        let result =
            ResidualFilterOperator::from_descriptor(&descriptor, Box::new(Cells(Vec::new(), 0)));
        assert!(result.is_err());
    }
}

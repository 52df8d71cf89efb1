//! Row-count operator
//!
//! Consumes its entire partition eagerly, counting distinct row-key
//! boundaries, then emits exactly one synthetic cell carrying the count
//! and signals exhaustion. With partitioned scans each partition emits its
//! own cell; the read path sums them.

use crate::codec::serialize;
use crate::store::{Cell, CellCursor, StoreResult};
use crate::types::TypedValue;

/// Family of the synthetic count cell.
pub const ROW_COUNT_FAMILY: &str = "rowcount";

enum CountState {
    Pending,
    Emitted,
}

/// Counts distinct rows in the partition below it.
pub(crate) struct RowCountOperator {
    inner: Box<dyn CellCursor>,
    state: CountState,
}

impl RowCountOperator {
    pub fn new(inner: Box<dyn CellCursor>) -> Self {
        Self {
            inner,
            state: CountState::Pending,
        }
    }
}

impl CellCursor for RowCountOperator {
    fn next_cell(&mut self) -> StoreResult<Option<Cell>> {
        match self.state {
            CountState::Emitted => Ok(None),
            CountState::Pending => {
                let mut count: i64 = 0;
                let mut last_row: Option<Vec<u8>> = None;
                while let Some(cell) = self.inner.next_cell()? {
                    if last_row.as_deref() != Some(cell.row.as_slice()) {
                        count += 1;
                        last_row = Some(cell.row);
                    }
                }
                self.state = CountState::Emitted;
                Ok(Some(Cell::new(
                    ROW_COUNT_FAMILY.as_bytes(),
                    ROW_COUNT_FAMILY,
                    Vec::new(),
                    serialize(&TypedValue::Int(count)),
                )))
            }
        }
    }

    fn seek(&mut self, row_key: &[u8]) -> StoreResult<()> {
        // A pending count simply resumes from the seek target; after the
        // synthetic cell is out there is nothing left to position.
        if matches!(self.state, CountState::Pending) {
            self.inner.seek(row_key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::deserialize;
    use crate::types::TypeTag;

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

    fn cell(row: &[u8], qualifier: &[u8]) -> Cell {
        Cell::new(row, "cf", qualifier, &b"v"[..])
    }

    #[test]
    fn test_counts_row_boundaries_not_cells() {
        let cells = vec![
            cell(b"a", b"x"),
            cell(b"a", b"y"),
            cell(b"b", b"x"),
            cell(b"c", b"x"),
            cell(b"c", b"y"),
        ];
        let mut op = RowCountOperator::new(Box::new(Cells(cells, 0)));
        let out = op.next_cell().unwrap().unwrap();
        assert_eq!(out.family, ROW_COUNT_FAMILY);
        assert_eq!(
            deserialize(&out.value, TypeTag::Int).unwrap(),
            TypedValue::Int(3)
        );
        assert!(op.next_cell().unwrap().is_none());
    }

    #[test]
    fn test_empty_partition_counts_zero() {
        let mut op = RowCountOperator::new(Box::new(Cells(Vec::new(), 0)));
        let out = op.next_cell().unwrap().unwrap();
        assert_eq!(
            deserialize(&out.value, TypeTag::Int).unwrap(),
            TypedValue::Int(0)
        );
    }

    #[test]
    fn test_seek_before_consume_restarts_count() {
        let cells = vec![cell(b"a", b"x"), cell(b"b", b"x"), cell(b"c", b"x")];
        let mut op = RowCountOperator::new(Box::new(Cells(cells, 0)));
        op.seek(b"b").unwrap();
        let out = op.next_cell().unwrap().unwrap();
        assert_eq!(
            deserialize(&out.value, TypeTag::Int).unwrap(),
            TypedValue::Int(2)
        );
    }
}

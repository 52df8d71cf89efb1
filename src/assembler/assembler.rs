use crate::codec::{decode_key, deserialize};
use crate::planner::Projection;
use crate::schema::ValueSlot;
use crate::store::{Cell, CellCursor, StoreError, StoreResult};
use crate::types::{TypeTag, TypedValue};

use super::Row;

/// Assembles scanned cells into relational rows.
///
/// Holds at most one pending cell across row boundaries, so rows stream
/// lazily off the cursor. A missing cursor (the backing table does not
/// exist) yields an empty result rather than an error.
pub struct RowAssembler {
    cursor: Option<Box<dyn CellCursor>>,
    projection: Projection,
    pending: Option<Cell>,
}

impl RowAssembler {
    /// Wraps a scan cursor; None means the table has no backing data.
    pub fn new(cursor: Option<Box<dyn CellCursor>>, projection: Projection) -> Self {
        Self {
            cursor,
            projection,
            pending: None,
        }
    }

    /// Pulls the next assembled row, or None at exhaustion.
    pub fn next_row(&mut self) -> StoreResult<Option<Row>> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(None);
        };
        let first = match self.pending.take() {
            Some(cell) => cell,
            None => match cursor.next_cell()? {
                Some(cell) => cell,
                None => return Ok(None),
            },
        };
        let mut row = Row::new();
        fill_row_key(&self.projection, &mut row, &first.row)?;
        apply_cell(&self.projection, &mut row, &first)?;
        loop {
            match cursor.next_cell()? {
                Some(cell) if cell.row == first.row => {
                    apply_cell(&self.projection, &mut row, &cell)?
                }
                Some(cell) => {
                    self.pending = Some(cell);
                    break;
                }
                None => break,
            }
        }
        Ok(Some(row))
    }

    /// Releases the underlying cursor; further reads return None.
    pub fn close(&mut self) {
        self.cursor = None;
        self.pending = None;
    }
}

fn fill_row_key(projection: &Projection, row: &mut Row, key: &[u8]) -> StoreResult<()> {
    if let Some(col) = projection.row_key_column() {
        row.set(col.name.clone(), decode_key(key, col.tag)?);
    }
    Ok(())
}

fn apply_cell(projection: &Projection, row: &mut Row, cell: &Cell) -> StoreResult<()> {
    let qualifier = std::str::from_utf8(&cell.qualifier).ok();
    let Some(col) = projection.resolve(&cell.family, qualifier) else {
        return Ok(());
    };
    let Some(binding) = &col.binding else {
        return Ok(());
    };
    let bytes = match binding.slot {
        ValueSlot::Value => cell.value.as_slice(),
        ValueSlot::Qualifier => cell.qualifier.as_slice(),
    };
    row.set(col.name.clone(), deserialize(bytes, col.tag)?);
    Ok(())
}

/// Sums the per-partition count cells a row-count scan produced.
pub fn sum_row_counts(cursor: Option<Box<dyn CellCursor>>) -> StoreResult<i64> {
    let Some(mut cursor) = cursor else {
        return Ok(0);
    };
    let mut total: i64 = 0;
    while let Some(cell) = cursor.next_cell()? {
        match deserialize(&cell.value, TypeTag::Int)? {
            TypedValue::Int(n) => total += n,
            other => {
                return Err(StoreError::Scan(format!(
                    "count cell decoded to {other:?}, expected an integer"
                )))
            }
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::serialize;
    use crate::operators::ROW_COUNT_FAMILY;
    use crate::schema::{ColumnBinding, ColumnDef, TableMapping};
    use crate::types::TypeTag;

    struct FixedCursor {
        cells: Vec<Cell>,
        pos: usize,
    }

    impl CellCursor for FixedCursor {
        fn next_cell(&mut self) -> StoreResult<Option<Cell>> {
            let c = self.cells.get(self.pos).cloned();
            if c.is_some() {
                self.pos += 1;
            }
            Ok(c)
        }

        fn seek(&mut self, row_key: &[u8]) -> StoreResult<()> {
            self.pos = self
                .cells
                .iter()
                .position(|c| c.row.as_slice() >= row_key)
                .unwrap_or(self.cells.len());
            Ok(())
        }
    }

    fn mapping() -> TableMapping {
        TableMapping::new(
            "people",
            vec![
                ColumnDef::row_key("id", TypeTag::String),
                ColumnDef::new("name", TypeTag::String, ColumnBinding::value("cf", "name")),
                ColumnDef::new("tag", TypeTag::String, ColumnBinding::in_qualifier("tags")),
            ],
            vec!["id".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_assembles_rows_at_key_boundaries() {
        let cursor = FixedCursor {
            cells: vec![
                Cell::new(&b"1"[..], "cf", &b"name"[..], &b"Alice"[..]),
                Cell::new(&b"1"[..], "tags", &b"admin"[..], &b""[..]),
                Cell::new(&b"2"[..], "cf", &b"name"[..], &b"Bob"[..]),
            ],
            pos: 0,
        };
        let projection = Projection::all_columns(&mapping());
        let mut assembler = RowAssembler::new(Some(Box::new(cursor)), projection);

        let row = assembler.next_row().unwrap().unwrap();
        assert_eq!(row.get("id"), &TypedValue::String("1".into()));
        assert_eq!(row.get("name"), &TypedValue::String("Alice".into()));
        assert_eq!(row.get("tag"), &TypedValue::String("admin".into()));

        let row = assembler.next_row().unwrap().unwrap();
        assert_eq!(row.get("id"), &TypedValue::String("2".into()));
        assert_eq!(row.get("name"), &TypedValue::String("Bob".into()));
        assert_eq!(row.get("tag"), &TypedValue::Null);

        assert!(assembler.next_row().unwrap().is_none());
    }

    #[test]
    fn test_family_only_column_resolves_empty_qualifier() {
        // A VALUE-slot column addressed by family alone stores its cell
        // under an empty qualifier; resolution falls back to the family.
        let mapping = TableMapping::new(
            "events",
            vec![
                ColumnDef::row_key("id", TypeTag::String),
                ColumnDef::new(
                    "payload",
                    TypeTag::String,
                    ColumnBinding::family_only("body"),
                ),
            ],
            vec!["id".into()],
        )
        .unwrap();
        let cursor = FixedCursor {
            cells: vec![Cell::new(&b"1"[..], "body", &b""[..], &b"hello"[..])],
            pos: 0,
        };
        let projection = Projection::all_columns(&mapping);
        let mut assembler = RowAssembler::new(Some(Box::new(cursor)), projection);
        let row = assembler.next_row().unwrap().unwrap();
        assert_eq!(row.get("payload"), &TypedValue::String("hello".into()));
    }

    #[test]
    fn test_missing_table_yields_empty_result() {
        let projection = Projection::all_columns(&mapping());
        let mut assembler = RowAssembler::new(None, projection);
        assert!(assembler.next_row().unwrap().is_none());
    }

    #[test]
    fn test_unresolved_cells_are_skipped() {
        let cursor = FixedCursor {
            cells: vec![
                Cell::new(&b"1"[..], "cf", &b"name"[..], &b"Alice"[..]),
                Cell::new(&b"1"[..], "unmapped", &b"x"[..], &b"y"[..]),
            ],
            pos: 0,
        };
        let projection = Projection::all_columns(&mapping());
        let mut assembler = RowAssembler::new(Some(Box::new(cursor)), projection);
        let row = assembler.next_row().unwrap().unwrap();
        assert_eq!(row.get("name"), &TypedValue::String("Alice".into()));
    }

    #[test]
    fn test_sum_row_counts_across_partitions() {
        let count = |n: i64| serialize(&TypedValue::Int(n));
        let cursor = FixedCursor {
            cells: vec![
                Cell::new(&b"rowcount"[..], ROW_COUNT_FAMILY, &b""[..], count(3)),
                Cell::new(&b"rowcount"[..], ROW_COUNT_FAMILY, &b""[..], count(2)),
            ],
            pos: 0,
        };
        assert_eq!(sum_row_counts(Some(Box::new(cursor))).unwrap(), 5);
        assert_eq!(sum_row_counts(None).unwrap(), 0);
    }
}

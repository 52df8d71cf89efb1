//! Row-boundary buffering
//!
//! The merge-join technique shared by row-buffering operators: pull cells
//! from the underlying cursor, holding at most one pending cell across row
//! boundaries, and hand back complete rows one at a time.

use std::collections::BTreeMap;

use crate::codec::{decode_key, deserialize};
use crate::schema::{ColumnDef, ValueSlot};
use crate::store::{Cell, CellCursor, StoreResult};

use super::eval::FlatRow;

/// Single pending-cell slot over a cell cursor.
#[derive(Default)]
pub(crate) struct RowReader {
    pending: Option<Cell>,
}

impl RowReader {
    /// Pulls the next complete row's cells, or None at exhaustion.
    pub fn next_row(&mut self, inner: &mut dyn CellCursor) -> StoreResult<Option<Vec<Cell>>> {
        let first = match self.pending.take() {
            Some(cell) => cell,
            None => match inner.next_cell()? {
                Some(cell) => cell,
                None => return Ok(None),
            },
        };
        let mut cells = vec![first];
        loop {
            match inner.next_cell()? {
                Some(cell) if cell.row == cells[0].row => cells.push(cell),
                Some(cell) => {
                    self.pending = Some(cell);
                    break;
                }
                None => break,
            }
        }
        Ok(Some(cells))
    }

    /// Drops in-flight row-assembly state ahead of a re-seek.
    pub fn reset(&mut self) {
        self.pending = None;
    }
}

/// Decodes one row's cells into a flat column-name → value map using the
/// embedded column metadata, mirroring the read-path row assembler.
pub(crate) fn decode_flat_row(cells: &[Cell], columns: &[ColumnDef]) -> StoreResult<FlatRow> {
    let mut row = BTreeMap::new();
    let Some(first) = cells.first() else {
        return Ok(row);
    };
    // Row-key-bound columns decode from the key itself; the synthetic
    // rowid alias is always visible to residual predicates.
    for def in columns.iter().filter(|c| c.is_row_key()) {
        let value = decode_key(&first.row, def.tag)?;
        row.insert(crate::schema::ROWID_COLUMN.to_string(), value.clone());
        row.insert(def.name.clone(), value);
    }
    for cell in cells {
        let Some((def, binding)) = resolve(columns, cell) else {
            continue;
        };
        let bytes = match binding.slot {
            ValueSlot::Value => cell.value.as_slice(),
            ValueSlot::Qualifier => cell.qualifier.as_slice(),
        };
        row.insert(def.name.clone(), deserialize(bytes, def.tag)?);
    }
    Ok(row)
}

/// Exact `(family, qualifier)` match first, then `family` alone.
fn resolve<'a>(
    columns: &'a [ColumnDef],
    cell: &Cell,
) -> Option<(&'a ColumnDef, &'a crate::schema::ColumnBinding)> {
    let bound = columns
        .iter()
        .filter_map(|def| def.binding.as_ref().map(|b| (def, b)))
        .filter(|(_, b)| b.family == cell.family);
    let mut family_only = None;
    for (def, binding) in bound {
        match &binding.qualifier {
            Some(q) if q.as_bytes() == cell.qualifier.as_slice() => return Some((def, binding)),
            None if family_only.is_none() => family_only = Some((def, binding)),
            _ => {}
        }
    }
    family_only
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnBinding;
    use crate::types::{TypeTag, TypedValue};

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

    #[test]
    fn test_row_boundary_grouping() {
        let mut cursor = FixedCursor {
            cells: vec![
                Cell::new(&b"a"[..], "cf", &b"x"[..], &b"1"[..]),
                Cell::new(&b"a"[..], "cf", &b"y"[..], &b"2"[..]),
                Cell::new(&b"b"[..], "cf", &b"x"[..], &b"3"[..]),
            ],
            pos: 0,
        };
        let mut reader = RowReader::default();
        let row1 = reader.next_row(&mut cursor).unwrap().unwrap();
        assert_eq!(row1.len(), 2);
        let row2 = reader.next_row(&mut cursor).unwrap().unwrap();
        assert_eq!(row2.len(), 1);
        assert!(reader.next_row(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn test_decode_flat_row_with_key_column() {
        let columns = vec![
            ColumnDef::row_key("id", TypeTag::String),
            ColumnDef::new("name", TypeTag::String, ColumnBinding::value("cf", "name")),
        ];
        let cells = vec![Cell::new(&b"7"[..], "cf", &b"name"[..], &b"Alice"[..])];
        let row = decode_flat_row(&cells, &columns).unwrap();
        assert_eq!(row["id"], TypedValue::String("7".into()));
        assert_eq!(row["name"], TypedValue::String("Alice".into()));
    }
}

//! Column filter operator
//!
//! Accepts or rejects whole rows on the presence (or value) of a single
//! designated cell, with an optional negation flag. Buffers one row at a
//! time with the same merge-join technique as the residual evaluator.

use std::collections::VecDeque;

use crate::store::{Cell, CellCursor, StoreError, StoreResult};

use super::descriptor::{options, OperatorDescriptor};
use super::rowbuf::RowReader;

pub(crate) struct ColumnFilterOperator {
    inner: Box<dyn CellCursor>,
    family: String,
    qualifier: Option<Vec<u8>>,
    value: Option<Vec<u8>>,
    negated: bool,
    reader: RowReader,
    accepted: VecDeque<Cell>,
}

impl ColumnFilterOperator {
    /// Rebuilds the operator from its descriptor options alone.
    pub fn from_descriptor(
        descriptor: &OperatorDescriptor,
        inner: Box<dyn CellCursor>,
    ) -> StoreResult<Self> {
        let family = descriptor
            .option(options::FAMILY)
            .ok_or_else(|| StoreError::OperatorOptions("column filter family missing".into()))?
            .to_string();
        Ok(Self {
            inner,
            family,
            qualifier: descriptor
                .option(options::QUALIFIER)
                .map(|q| q.as_bytes().to_vec()),
            value: descriptor
                .option(options::VALUE)
                .map(|v| v.as_bytes().to_vec()),
            negated: descriptor.option(options::NEGATED) == Some("true"),
            reader: RowReader::default(),
            accepted: VecDeque::new(),
        })
    }

    fn row_matches(&self, cells: &[Cell]) -> bool {
        cells.iter().any(|cell| {
            cell.family == self.family
                && self
                    .qualifier
                    .as_ref()
                    .map_or(true, |q| &cell.qualifier == q)
                && self.value.as_ref().map_or(true, |v| &cell.value == v)
        })
    }
}

impl CellCursor for ColumnFilterOperator {
    fn next_cell(&mut self) -> StoreResult<Option<Cell>> {
        loop {
            if let Some(cell) = self.accepted.pop_front() {
                return Ok(Some(cell));
            }
            match self.reader.next_row(self.inner.as_mut())? {
                None => return Ok(None),
                Some(cells) => {
                    if self.row_matches(&cells) != self.negated {
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

//! In-memory column-family store
//!
//! A deterministic fixture backend: cells live in a BTreeMap ordered by
//! (row, family, qualifier), which matches the scan invariant of the real
//! store (rows sorted by key, cells within a row sorted by family then
//! qualifier). Partitioned scans split the range list into contiguous
//! chunks and rebuild the operator chain per partition from descriptors,
//! exactly as the real store instantiates operator copies per sub-range.

use std::collections::{HashMap, VecDeque};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::operators::build_chain;
use crate::planner::KeyRange;

use super::cell::{Cell, Mutation, MutationKind};
use super::conn::{BatchWriter, CellCursor, ScanRequest, StoreConnection};
use super::errors::{StoreError, StoreResult};

type CellKey = (Vec<u8>, String, Vec<u8>);

#[derive(Default)]
struct TableData {
    cells: BTreeMap<CellKey, (Vec<u8>, i64)>,
}

#[derive(Default)]
struct Inner {
    tables: HashMap<String, TableData>,
    clock: i64,
}

/// Shared-handle in-memory store.
#[derive(Clone, Default)]
pub struct MemStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every cell of a table in scan order, for test assertions.
    pub fn snapshot(&self, table: &str) -> Option<Vec<Cell>> {
        let inner = self.lock();
        inner.tables.get(table).map(|t| {
            t.cells
                .iter()
                .map(|((row, family, qualifier), (value, ts))| Cell {
                    row: row.clone(),
                    family: family.clone(),
                    qualifier: qualifier.clone(),
                    value: value.clone(),
                    timestamp: *ts,
                })
                .collect()
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned fixture store has no recovery story; propagating the
        // inner state is still deterministic.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn apply(inner: &mut Inner, table: &str, mutation: Mutation) -> StoreResult<()> {
        inner.clock += 1;
        let ts = inner.clock;
        let data = inner
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        match mutation.kind {
            MutationKind::Put(puts) => {
                for put in puts {
                    data.cells.insert(
                        (mutation.row.clone(), put.family, put.qualifier),
                        (put.value, ts),
                    );
                }
            }
            MutationKind::DeleteRow => {
                data.cells.retain(|(row, _, _), _| row != &mutation.row);
            }
        }
        Ok(())
    }
}

impl StoreConnection for MemStore {
    fn table_exists(&self, table: &str) -> StoreResult<bool> {
        Ok(self.lock().tables.contains_key(table))
    }

    fn create_table(&self, table: &str) -> StoreResult<()> {
        self.lock()
            .tables
            .entry(table.to_string())
            .or_insert_with(TableData::default);
        Ok(())
    }

    fn scan(&self, request: ScanRequest) -> StoreResult<Option<Box<dyn CellCursor>>> {
        let inner = self.lock();
        let Some(data) = inner.tables.get(&request.table) else {
            return Ok(None);
        };

        // Contiguous range chunks preserve global row-key order when the
        // partition cursors are concatenated in order.
        let partitions = request.partitions.clamp(1, request.ranges.len().max(1));
        let chunk = request.ranges.len().div_ceil(partitions).max(1);

        let mut parts: Vec<Box<dyn CellCursor>> = Vec::new();
        for ranges in request.ranges.chunks(chunk) {
            let cells = collect_cells(data, ranges);
            let base: Box<dyn CellCursor> = Box::new(VecCursor::new(cells));
            parts.push(build_chain(&request.operators, base)?);
        }
        if parts.is_empty() {
            // No ranges at all: the plan proved the predicate unsatisfiable.
            parts.push(Box::new(VecCursor::new(Vec::new())));
        }
        Ok(Some(Box::new(SequenceCursor::new(parts))))
    }

    fn writer(&self, table: &str, batch_size: usize) -> StoreResult<Box<dyn BatchWriter + '_>> {
        if !self.table_exists(table)? {
            return Err(StoreError::TableNotFound(table.to_string()));
        }
        Ok(Box::new(MemWriter {
            store: self.clone(),
            table: table.to_string(),
            batch_size: batch_size.max(1),
            buffer: Vec::new(),
            closed: false,
        }))
    }
}

fn collect_cells(data: &TableData, ranges: &[KeyRange]) -> Vec<Cell> {
    let mut out = Vec::new();
    for ((row, family, qualifier), (value, ts)) in &data.cells {
        if ranges.iter().any(|r| r.contains(row)) {
            out.push(Cell {
                row: row.clone(),
                family: family.clone(),
                qualifier: qualifier.clone(),
                value: value.clone(),
                timestamp: *ts,
            });
        }
    }
    out
}

/// Cursor over a materialized, sorted cell list.
struct VecCursor {
    cells: Vec<Cell>,
    pos: usize,
}

impl VecCursor {
    fn new(cells: Vec<Cell>) -> Self {
        Self { cells, pos: 0 }
    }
}

impl CellCursor for VecCursor {
    fn next_cell(&mut self) -> StoreResult<Option<Cell>> {
        let cell = self.cells.get(self.pos).cloned();
        if cell.is_some() {
            self.pos += 1;
        }
        Ok(cell)
    }

    fn seek(&mut self, row_key: &[u8]) -> StoreResult<()> {
        // A re-seek may rewind; search from the start.
        self.pos = self
            .cells
            .iter()
            .position(|c| c.row.as_slice() >= row_key)
            .unwrap_or(self.cells.len());
        Ok(())
    }
}

/// Concatenates partition cursors in range order.
struct SequenceCursor {
    parts: VecDeque<Box<dyn CellCursor>>,
}

impl SequenceCursor {
    fn new(parts: Vec<Box<dyn CellCursor>>) -> Self {
        Self {
            parts: parts.into(),
        }
    }
}

impl CellCursor for SequenceCursor {
    fn next_cell(&mut self) -> StoreResult<Option<Cell>> {
        while let Some(front) = self.parts.front_mut() {
            match front.next_cell()? {
                Some(cell) => return Ok(Some(cell)),
                None => {
                    self.parts.pop_front();
                }
            }
        }
        Ok(None)
    }

    fn seek(&mut self, row_key: &[u8]) -> StoreResult<()> {
        for part in self.parts.iter_mut() {
            part.seek(row_key)?;
        }
        Ok(())
    }
}

/// Batch writer against the in-memory store.
struct MemWriter {
    store: MemStore,
    table: String,
    batch_size: usize,
    buffer: Vec<Mutation>,
    closed: bool,
}

impl BatchWriter for MemWriter {
    fn write(&mut self, mutation: Mutation) -> StoreResult<()> {
        if self.closed {
            return Err(StoreError::MutationRejected("writer is closed".into()));
        }
        self.buffer.push(mutation);
        if self.buffer.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> StoreResult<()> {
        let mut inner = self.store.lock();
        for mutation in self.buffer.drain(..) {
            MemStore::apply(&mut inner, &self.table, mutation)?;
        }
        Ok(())
    }

    fn close(&mut self) -> StoreResult<()> {
        if self.closed {
            return Ok(());
        }
        self.flush()?;
        self.closed = true;
        Ok(())
    }
}

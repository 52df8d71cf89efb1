//! Store connection traits
//!
//! The seams the translator is written against. A real backend adapter and
//! the in-memory fixture store both implement these.

use crate::operators::OperatorDescriptor;
use crate::planner::KeyRange;

use super::cell::{Cell, Mutation};
use super::errors::StoreResult;

/// A range-scoped scan request with its attached operator chain.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Target backing table
    pub table: String,
    /// Normalized, disjoint key ranges, in ascending order
    pub ranges: Vec<KeyRange>,
    /// Operator descriptors, rebuilt per partition inside the store
    pub operators: Vec<OperatorDescriptor>,
    /// Number of partition scans to run; 1 disables partitioning
    pub partitions: usize,
}

impl ScanRequest {
    /// Builds a single-partition scan request.
    pub fn new(table: impl Into<String>, ranges: Vec<KeyRange>) -> Self {
        Self {
            table: table.into(),
            ranges,
            operators: Vec::new(),
            partitions: 1,
        }
    }

    /// Attaches operator descriptors.
    pub fn with_operators(mut self, operators: Vec<OperatorDescriptor>) -> Self {
        self.operators = operators;
        self
    }

    /// Sets the partition count.
    pub fn with_partitions(mut self, partitions: usize) -> Self {
        self.partitions = partitions.max(1);
        self
    }
}

/// Pull-based cell stream in ascending row-key order.
pub trait CellCursor: Send {
    /// Returns the next cell, or None when the scan is exhausted.
    fn next_cell(&mut self) -> StoreResult<Option<Cell>>;

    /// Repositions the cursor at the first cell whose row key is at or
    /// beyond `row_key`. The store may re-seek a partition to the last key
    /// it returned; implementations must not corrupt in-flight state.
    fn seek(&mut self, row_key: &[u8]) -> StoreResult<()>;
}

/// Batched mutation writer. A writer failure aborts the remaining batch;
/// no partial results are reported for a failed batch.
pub trait BatchWriter {
    /// Queues a mutation, flushing if the batch boundary is reached.
    fn write(&mut self, mutation: Mutation) -> StoreResult<()>;

    /// Flushes queued mutations to the store.
    fn flush(&mut self) -> StoreResult<()>;

    /// Flushes and releases the writer. Idempotent.
    fn close(&mut self) -> StoreResult<()>;
}

/// A connection to the backend store, exclusively owned by one execution.
pub trait StoreConnection {
    /// Returns true if the backing table exists.
    fn table_exists(&self, table: &str) -> StoreResult<bool>;

    /// Creates the backing table if absent.
    fn create_table(&self, table: &str) -> StoreResult<()>;

    /// Opens a scan. Returns Ok(None) when the backing table does not
    /// exist: relational metadata may legitimately be ahead of backend
    /// reality, so this is an empty result, not an error.
    fn scan(&self, request: ScanRequest) -> StoreResult<Option<Box<dyn CellCursor>>>;

    /// Acquires a batch writer. Fails with
    /// [`super::StoreError::TableNotFound`] when the table is absent.
    fn writer(&self, table: &str, batch_size: usize) -> StoreResult<Box<dyn BatchWriter + '_>>;
}

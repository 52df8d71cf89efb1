//! Backend store interface
//!
//! The translator talks to the column-family store through three trait
//! seams: [`StoreConnection`] (scans, writers, table lifecycle),
//! [`CellCursor`] (pull-based cell stream in row-key order), and
//! [`BatchWriter`] (batched puts and row deletes). A connection is owned
//! exclusively by one execution instance for its lifetime.
//!
//! [`MemStore`] is the deterministic in-memory implementation backing the
//! test suite; it honors range scans, partitioned scans with per-partition
//! operator chains, and missing-table semantics.

mod cell;
mod conn;
mod errors;
mod memstore;

pub use cell::{Cell, Mutation, MutationKind, PutCell};
pub use conn::{BatchWriter, CellCursor, ScanRequest, StoreConnection};
pub use errors::{StoreError, StoreResult};
pub use memstore::MemStore;

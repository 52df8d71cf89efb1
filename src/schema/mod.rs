//! Table and column mapping metadata
//!
//! Binds each relational column to a storage location in the column-family
//! store: `{family, qualifier?, value slot}`. A synthetic `rowid` column is
//! always present and bound to the row key.
//!
//! # Invariants
//!
//! - At most one column maps to a given `(family, qualifier)` pair with a
//!   VALUE slot
//! - The mapping is built once per table and immutable for the life of a
//!   translator instance

mod errors;
mod mapping;
mod naming;

pub use errors::{MappingError, MappingErrorCode, MappingResult};
pub use mapping::{ColumnBinding, ColumnDef, TableMapping, ValueSlot, ROWID_COLUMN};
pub use naming::ColumnNamePattern;

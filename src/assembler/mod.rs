//! Row assembler (read path)
//!
//! Drives the scan cursor and merges contiguous cells sharing a row key
//! into one logical relational row: a one-row-lookahead merge join against
//! the row-key boundary, implemented with a single pending-cell slot. Each
//! cell resolves to a projected column via the `(family, qualifier)` index
//! and decodes through the type codec.

mod assembler;
mod row;

pub use assembler::{sum_row_counts, RowAssembler};
pub use row::Row;

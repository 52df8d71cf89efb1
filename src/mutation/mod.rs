//! Mutation translator (write path)
//!
//! Translates INSERT, UPDATE, and DELETE statements into keyed store
//! mutations. UPDATE and DELETE locate their target rows by planning the
//! WHERE clause into key ranges and scanning; affected counts are distinct
//! row keys, not cells.

mod statement;
mod translator;

pub use statement::{AssignValue, Assignment, DeleteStatement, InputRow, InsertSource, UpdateStatement};
pub use translator::MutationTranslator;

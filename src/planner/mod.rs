//! Predicate-to-range planner
//!
//! A single structurally recursive walk of the WHERE clause produces, per
//! subtree, a set of sorted-key ranges and a residual-evaluation flag:
//!
//! - predicates on the primary-key column narrow to key ranges
//! - anything else leaves ranges untouched and raises the residual flag
//! - AND intersects, OR union-merges
//!
//! The planner also records the ordered column projection with its
//! `(family, qualifier)` lookup index, and registers pushdown operator
//! descriptors (row count, residual filter) for the scan.

mod errors;
mod planner;
mod predicate;
mod projection;
mod ranges;

pub use errors::{PlanError, PlanErrorCode, PlanResult};
pub use planner::{Planner, ScanPlan};
pub use predicate::{Aggregate, CompareOp, Filter};
pub use projection::{ProjectedColumn, Projection};
pub use ranges::{KeyRange, RangeSet};

//! rangelift - relational pushdown translation for sorted column-family stores
//!
//! The translator sits between a federated query engine and a byte-ordered,
//! column-family key-value backend. It converts parsed relational commands
//! into native scans and mutations, and native cells back into rows:
//!
//! - `planner` turns WHERE clauses over the primary key into covering sets
//!   of sorted-key ranges plus residual pushdown operators
//! - `codec` encodes typed values, order-preserving for scan boundaries and
//!   opaque for stored payloads
//! - `assembler` merges contiguous cells at row-key boundaries back into rows
//! - `mutation` translates INSERT/UPDATE/DELETE into batched store mutations
//! - `operators` are the deep-copyable scan-time units shipped into the store
//! - `exec` is the capability contract and execution lifecycle the engine sees

pub mod assembler;
pub mod codec;
pub mod exec;
pub mod mutation;
pub mod observability;
pub mod operators;
pub mod planner;
pub mod schema;
pub mod store;
pub mod types;

//! Structured logging
//!
//! One JSON line per event, synchronous, deterministic key ordering.
//! Logging is read-only: it never affects planning or execution.

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

//! Observable translator events
//!
//! Every externally visible state change the translator makes is a typed
//! event with an uppercase wire name.

use std::fmt;

/// Events emitted during translation and execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A scan plan was produced for a read
    PlanBuilt,
    /// A store scan was opened
    ScanOpen,
    /// A read execution finished or was closed
    ScanComplete,
    /// A mutation batch was flushed to the store
    BatchFlush,
    /// A backing table was created lazily on first write
    TableCreated,
    /// A statement was rejected at translation time
    StatementRejected,
    /// An execution was cancelled from another thread
    ExecutionCancelled,
}

impl Event {
    /// Returns the wire name of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::PlanBuilt => "PLAN_BUILT",
            Event::ScanOpen => "SCAN_OPEN",
            Event::ScanComplete => "SCAN_COMPLETE",
            Event::BatchFlush => "BATCH_FLUSH",
            Event::TableCreated => "TABLE_CREATED",
            Event::StatementRejected => "STATEMENT_REJECTED",
            Event::ExecutionCancelled => "EXECUTION_CANCELLED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

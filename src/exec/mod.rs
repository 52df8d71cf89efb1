//! Capability contract and execution lifecycle
//!
//! The outward face of the translator: a static capability declaration the
//! engine consults before building commands, the inbound command tree, and
//! the read/update execution state machines.

mod capabilities;
mod command;
mod config;
mod errors;
mod read;
mod update;

pub use capabilities::Capabilities;
pub use command::{Command, SelectCommand};
pub use config::TranslatorConfig;
pub use errors::{TranslatorError, TranslatorResult};
pub use read::{CancelToken, ExecutionKind, ReadExecution, COUNT_COLUMN};
pub use update::UpdateExecution;

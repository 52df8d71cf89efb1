//! Inbound command tree
//!
//! The shapes the engine hands the translator after consulting the
//! capability contract. Commands are plain data; all validation happens
//! when they execute.

use serde::{Deserialize, Serialize};

use crate::mutation::{DeleteStatement, InsertSource, UpdateStatement};
use crate::planner::{Aggregate, Filter};

/// A read against the mapped table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectCommand {
    /// Projected column names; empty means every mapped column
    pub columns: Vec<String>,
    pub filter: Option<Filter>,
    pub aggregate: Option<Aggregate>,
}

impl SelectCommand {
    /// A plain projection read.
    pub fn new(columns: Vec<String>, filter: Option<Filter>) -> Self {
        Self {
            columns,
            filter,
            aggregate: None,
        }
    }

    /// A COUNT(*) read.
    pub fn count_star(filter: Option<Filter>) -> Self {
        Self {
            columns: Vec::new(),
            filter,
            aggregate: Some(Aggregate::CountStar),
        }
    }
}

/// Every command shape the translator executes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Select(SelectCommand),
    Insert(InsertSource),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    /// A procedure-shaped direct read: same read path, plus an output
    /// parameter vector in the result
    Procedure(SelectCommand),
}

impl Command {
    /// Returns true for the mutation shapes.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Insert(_) | Command::Update(_) | Command::Delete(_)
        )
    }
}

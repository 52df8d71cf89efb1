//! Mutation statement shapes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::planner::Filter;
use crate::types::TypedValue;

/// One inbound row, keyed by relational column name.
pub type InputRow = BTreeMap<String, TypedValue>;

/// Where an INSERT's rows come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsertSource {
    /// A single literal row
    Row(InputRow),
    /// A pre-materialized bulk of rows
    Bulk(Vec<InputRow>),
}

impl InsertSource {
    /// Returns the rows in insertion order.
    pub fn rows(&self) -> &[InputRow] {
        match self {
            InsertSource::Row(row) => std::slice::from_ref(row),
            InsertSource::Bulk(rows) => rows,
        }
    }
}

/// Right-hand side of a SET clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignValue {
    /// A literal value, translatable to a put cell
    Literal(TypedValue),
    /// A positional parameter placeholder
    Parameter(usize),
}

/// One SET clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub column: String,
    pub value: AssignValue,
}

impl Assignment {
    /// A literal assignment.
    pub fn literal(column: impl Into<String>, value: TypedValue) -> Self {
        Self {
            column: column.into(),
            value: AssignValue::Literal(value),
        }
    }

    /// A positional-parameter assignment.
    pub fn parameter(column: impl Into<String>, index: usize) -> Self {
        Self {
            column: column.into(),
            value: AssignValue::Parameter(index),
        }
    }
}

/// An UPDATE statement against the mapped table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatement {
    pub assignments: Vec<Assignment>,
    pub filter: Option<Filter>,
    /// Parameter rows for a bulk-bound statement; unsupported downstream
    pub parameter_batch: Option<Vec<Vec<TypedValue>>>,
}

impl UpdateStatement {
    /// A literal UPDATE with an optional WHERE clause.
    pub fn new(assignments: Vec<Assignment>, filter: Option<Filter>) -> Self {
        Self {
            assignments,
            filter,
            parameter_batch: None,
        }
    }
}

/// A DELETE statement against the mapped table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteStatement {
    pub filter: Option<Filter>,
}

impl DeleteStatement {
    /// A DELETE with an optional WHERE clause.
    pub fn new(filter: Option<Filter>) -> Self {
        Self { filter }
    }
}

//! Operator descriptors
//!
//! The wire form of a pushdown operator: a priority, a kind, and a flat
//! string-keyed option map. Descriptors are deep-copyable and carry
//! everything an operator needs to rebuild itself for any key sub-range.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::planner::Filter;
use crate::schema::ColumnDef;

/// Option map keys.
pub mod options {
    /// Residual filter: serialized predicate tree
    pub const FILTER: &str = "filter";
    /// Residual filter: serialized column metadata list
    pub const COLUMNS: &str = "columns";
    /// Column filter: designated family
    pub const FAMILY: &str = "family";
    /// Column filter: designated qualifier
    pub const QUALIFIER: &str = "qualifier";
    /// Column filter: expected cell value
    pub const VALUE: &str = "value";
    /// Column filter: invert acceptance
    pub const NEGATED: &str = "negated";
}

/// Kinds of pushdown operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatorKind {
    RowCount,
    ResidualFilter,
    ColumnFilter,
}

/// An ordered, composable operator unit attached to a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorDescriptor {
    /// Chain position; lower priorities run closer to the raw scan
    pub priority: u32,
    pub kind: OperatorKind,
    /// Flat initialization options; the operator's only state source
    pub options: BTreeMap<String, String>,
}

impl OperatorDescriptor {
    /// Descriptor for the row-count aggregate operator.
    pub fn row_count() -> Self {
        Self {
            priority: 30,
            kind: OperatorKind::RowCount,
            options: BTreeMap::new(),
        }
    }

    /// Descriptor for the residual predicate evaluator, embedding the
    /// filter and the column metadata it resolves rows against.
    pub fn residual_filter(
        filter: &Filter,
        columns: &[ColumnDef],
    ) -> Result<Self, serde_json::Error> {
        let mut opts = BTreeMap::new();
        opts.insert(options::FILTER.to_string(), serde_json::to_string(filter)?);
        opts.insert(options::COLUMNS.to_string(), serde_json::to_string(columns)?);
        Ok(Self {
            priority: 20,
            kind: OperatorKind::ResidualFilter,
            options: opts,
        })
    }

    /// Descriptor for the single-cell column filter.
    pub fn column_filter(
        family: impl Into<String>,
        qualifier: Option<&str>,
        value: Option<&str>,
        negated: bool,
    ) -> Self {
        let mut opts = BTreeMap::new();
        opts.insert(options::FAMILY.to_string(), family.into());
        if let Some(q) = qualifier {
            opts.insert(options::QUALIFIER.to_string(), q.to_string());
        }
        if let Some(v) = value {
            opts.insert(options::VALUE.to_string(), v.to_string());
        }
        if negated {
            opts.insert(options::NEGATED.to_string(), "true".to_string());
        }
        Self {
            priority: 10,
            kind: OperatorKind::ColumnFilter,
            options: opts,
        }
    }

    /// Returns an option value.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

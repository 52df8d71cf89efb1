//! Filter predicate tree
//!
//! The parsed WHERE-clause shape handed in by the query engine. The tree is
//! serializable so residual predicates can ride inside operator option maps
//! into the store tier.

use serde::{Deserialize, Serialize};

use crate::types::TypedValue;

/// Comparison operators the capability contract declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// Returns the operator name for diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// A WHERE-clause predicate tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    /// column <op> literal
    Compare {
        column: String,
        op: CompareOp,
        value: TypedValue,
    },
    /// column [NOT] IN (values)
    In {
        column: String,
        values: Vec<TypedValue>,
        negated: bool,
    },
    /// column IS [NOT] NULL
    IsNull { column: String, negated: bool },
    /// column [NOT] LIKE pattern ('%' multi, '_' single)
    Like {
        column: String,
        pattern: String,
        negated: bool,
    },
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
}

impl Filter {
    /// column = value
    pub fn eq(column: impl Into<String>, value: TypedValue) -> Self {
        Filter::Compare {
            column: column.into(),
            op: CompareOp::Eq,
            value,
        }
    }

    /// column <> value
    pub fn ne(column: impl Into<String>, value: TypedValue) -> Self {
        Filter::Compare {
            column: column.into(),
            op: CompareOp::Ne,
            value,
        }
    }

    /// column < value
    pub fn lt(column: impl Into<String>, value: TypedValue) -> Self {
        Filter::Compare {
            column: column.into(),
            op: CompareOp::Lt,
            value,
        }
    }

    /// column <= value
    pub fn le(column: impl Into<String>, value: TypedValue) -> Self {
        Filter::Compare {
            column: column.into(),
            op: CompareOp::Le,
            value,
        }
    }

    /// column > value
    pub fn gt(column: impl Into<String>, value: TypedValue) -> Self {
        Filter::Compare {
            column: column.into(),
            op: CompareOp::Gt,
            value,
        }
    }

    /// column >= value
    pub fn ge(column: impl Into<String>, value: TypedValue) -> Self {
        Filter::Compare {
            column: column.into(),
            op: CompareOp::Ge,
            value,
        }
    }

    /// column IN (values)
    pub fn in_list(column: impl Into<String>, values: Vec<TypedValue>) -> Self {
        Filter::In {
            column: column.into(),
            values,
            negated: false,
        }
    }

    /// column NOT IN (values)
    pub fn not_in_list(column: impl Into<String>, values: Vec<TypedValue>) -> Self {
        Filter::In {
            column: column.into(),
            values,
            negated: true,
        }
    }

    /// column IS NULL
    pub fn is_null(column: impl Into<String>) -> Self {
        Filter::IsNull {
            column: column.into(),
            negated: false,
        }
    }

    /// column LIKE pattern
    pub fn like(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Filter::Like {
            column: column.into(),
            pattern: pattern.into(),
            negated: false,
        }
    }

    /// left AND right
    pub fn and(left: Filter, right: Filter) -> Self {
        Filter::And(Box::new(left), Box::new(right))
    }

    /// left OR right
    pub fn or(left: Filter, right: Filter) -> Self {
        Filter::Or(Box::new(left), Box::new(right))
    }
}

/// Aggregates recognized by the planner.
///
/// Only ungrouped COUNT(*) is pushdown-eligible; anything else is rejected
/// upstream by the capability contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregate {
    CountStar,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_serialization_roundtrip() {
        let filter = Filter::and(
            Filter::eq("id", TypedValue::String("7".into())),
            Filter::like("name", "A%"),
        );
        let json = serde_json::to_string(&filter).unwrap();
        let back: Filter = serde_json::from_str(&json).unwrap();
        assert_eq!(filter, back);
    }

    #[test]
    fn test_builders() {
        match Filter::not_in_list("id", vec![TypedValue::Int(1)]) {
            Filter::In { negated, .. } => assert!(negated),
            other => panic!("unexpected shape: {:?}", other),
        }
    }
}

//! Minimal residual predicate evaluator
//!
//! Evaluates a filter tree against one flat column-name → value row. The
//! grammar is fixed and small: comparisons, IN lists, IS NULL, LIKE, and
//! boolean connectives. Missing columns behave as NULL, and NULL never
//! satisfies a comparison; SQL's three-valued logic collapses to false at
//! this boundary.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use regex::Regex;

use crate::planner::{CompareOp, Filter};
use crate::types::TypedValue;

/// A decoded row as the evaluator sees it.
pub type FlatRow = BTreeMap<String, TypedValue>;

/// Evaluates `filter` against `row`.
pub fn evaluate(filter: &Filter, row: &FlatRow) -> bool {
    match filter {
        Filter::Compare { column, op, value } => {
            compare(lookup(row, column), value).map_or(false, |ord| op_holds(*op, ord))
        }
        Filter::In {
            column,
            values,
            negated,
        } => {
            let Some(actual) = lookup(row, column) else {
                return false;
            };
            if actual.is_null() {
                return false;
            }
            let found = values
                .iter()
                .any(|v| actual.relational_cmp(v) == Some(Ordering::Equal));
            if *negated {
                // NOT IN with a NULL member is never true.
                !found && !values.iter().any(TypedValue::is_null)
            } else {
                found
            }
        }
        Filter::IsNull { column, negated } => {
            let is_null = lookup(row, column).map_or(true, TypedValue::is_null);
            is_null != *negated
        }
        Filter::Like {
            column,
            pattern,
            negated,
        } => {
            let matched = match lookup(row, column) {
                Some(TypedValue::String(s)) => like_matches(pattern, s),
                _ => return false,
            };
            matched != *negated
        }
        Filter::And(left, right) => evaluate(left, row) && evaluate(right, row),
        Filter::Or(left, right) => evaluate(left, row) || evaluate(right, row),
    }
}

fn lookup<'a>(row: &'a FlatRow, column: &str) -> Option<&'a TypedValue> {
    row.get(column)
}

fn compare(actual: Option<&TypedValue>, expected: &TypedValue) -> Option<Ordering> {
    actual?.relational_cmp(expected)
}

fn op_holds(op: CompareOp, ord: Ordering) -> bool {
    match op {
        CompareOp::Eq => ord == Ordering::Equal,
        CompareOp::Ne => ord != Ordering::Equal,
        CompareOp::Lt => ord == Ordering::Less,
        CompareOp::Le => ord != Ordering::Greater,
        CompareOp::Gt => ord == Ordering::Greater,
        CompareOp::Ge => ord != Ordering::Less,
    }
}

/// SQL LIKE: '%' matches any run, '_' any single character.
fn like_matches(pattern: &str, candidate: &str) -> bool {
    let mut re = String::with_capacity(pattern.len() + 2);
    re.push('^');
    for c in pattern.chars() {
        match c {
            '%' => re.push_str(".*"),
            '_' => re.push('.'),
            c => re.push_str(&regex::escape(&c.to_string())),
        }
    }
    re.push('$');
    // The construction above only emits valid syntax; a failure here means
    // the pattern cannot match anything.
    Regex::new(&re).map_or(false, |r| r.is_match(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, TypedValue)]) -> FlatRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_comparisons() {
        let r = row(&[("age", TypedValue::Int(30))]);
        assert!(evaluate(&Filter::eq("age", TypedValue::Int(30)), &r));
        assert!(evaluate(&Filter::gt("age", TypedValue::Int(29)), &r));
        assert!(!evaluate(&Filter::lt("age", TypedValue::Int(30)), &r));
    }

    #[test]
    fn test_missing_and_null_never_match() {
        let r = row(&[("x", TypedValue::Null)]);
        assert!(!evaluate(&Filter::eq("x", TypedValue::Int(1)), &r));
        assert!(!evaluate(&Filter::eq("ghost", TypedValue::Int(1)), &r));
    }

    #[test]
    fn test_is_null() {
        let r = row(&[("x", TypedValue::Null), ("y", TypedValue::Int(1))]);
        assert!(evaluate(&Filter::is_null("x"), &r));
        assert!(evaluate(&Filter::is_null("ghost"), &r));
        assert!(!evaluate(&Filter::is_null("y"), &r));
        assert!(evaluate(
            &Filter::IsNull {
                column: "y".into(),
                negated: true
            },
            &r
        ));
    }

    #[test]
    fn test_like_wildcards() {
        let r = row(&[("name", TypedValue::String("Alice".into()))]);
        assert!(evaluate(&Filter::like("name", "A%"), &r));
        assert!(evaluate(&Filter::like("name", "A_ice"), &r));
        assert!(evaluate(&Filter::like("name", "%ice"), &r));
        assert!(!evaluate(&Filter::like("name", "B%"), &r));
        // Regex metacharacters in the pattern are literals.
        let r = row(&[("name", TypedValue::String("a.c".into()))]);
        assert!(evaluate(&Filter::like("name", "a.c"), &r));
        let r = row(&[("name", TypedValue::String("abc".into()))]);
        assert!(!evaluate(&Filter::like("name", "a.c"), &r));
    }

    #[test]
    fn test_in_lists() {
        let r = row(&[("id", TypedValue::Int(2))]);
        let members = vec![TypedValue::Int(1), TypedValue::Int(2)];
        assert!(evaluate(&Filter::in_list("id", members.clone()), &r));
        assert!(!evaluate(&Filter::not_in_list("id", members), &r));

        let r3 = row(&[("id", TypedValue::Int(3))]);
        assert!(evaluate(
            &Filter::not_in_list("id", vec![TypedValue::Int(1)]),
            &r3
        ));
        // NOT IN over a list containing NULL is never true.
        assert!(!evaluate(
            &Filter::not_in_list("id", vec![TypedValue::Int(1), TypedValue::Null]),
            &r3
        ));
    }

    #[test]
    fn test_connectives() {
        let r = row(&[
            ("a", TypedValue::Int(1)),
            ("b", TypedValue::String("x".into())),
        ]);
        let both = Filter::and(
            Filter::eq("a", TypedValue::Int(1)),
            Filter::eq("b", TypedValue::String("x".into())),
        );
        assert!(evaluate(&both, &r));
        let either = Filter::or(
            Filter::eq("a", TypedValue::Int(9)),
            Filter::eq("b", TypedValue::String("x".into())),
        );
        assert!(evaluate(&either, &r));
    }
}

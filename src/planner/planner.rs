//! Scan planning
//!
//! One recursive walk of the filter tree yields `(ranges, residual)` per
//! subtree. The accumulator starts as the single unbounded range; only
//! predicates whose left operand is the primary-key column narrow it.
//! When any subtree raises the residual flag, the whole filter ships to the
//! store as a residual-filter operator and is re-evaluated row by row.

use crate::codec::encode_key;
use crate::operators::OperatorDescriptor;
use crate::schema::TableMapping;
use crate::types::TypedValue;

use super::errors::{PlanError, PlanResult};
use super::predicate::{Aggregate, CompareOp, Filter};
use super::projection::Projection;
use super::ranges::{KeyRange, RangeSet};

/// The planner's output: everything a scan execution needs.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    /// Covering set of sorted-key ranges
    pub ranges: RangeSet,
    /// True if range selection alone cannot satisfy the filter
    pub residual: bool,
    /// Pushdown operators to attach to the scan, in priority order
    pub operators: Vec<OperatorDescriptor>,
    /// Ordered output projection
    pub projection: Projection,
    /// Recognized pushdown aggregate, if any
    pub aggregate: Option<Aggregate>,
}

/// Plans scans against one table mapping.
pub struct Planner<'a> {
    mapping: &'a TableMapping,
}

impl<'a> Planner<'a> {
    /// Creates a planner over an immutable table mapping.
    pub fn new(mapping: &'a TableMapping) -> Self {
        Self { mapping }
    }

    /// Plans a read: ranges, operators, and projection for the scan.
    pub fn plan_scan(
        &self,
        columns: &[String],
        filter: Option<&Filter>,
        aggregate: Option<Aggregate>,
    ) -> PlanResult<ScanPlan> {
        let (ranges, residual) = self.plan_ranges(filter)?;

        let mut operators = Vec::new();
        if residual {
            if let Some(filter) = filter {
                let descriptor =
                    OperatorDescriptor::residual_filter(filter, self.mapping.columns())
                        .map_err(|e| PlanError::internal(e.to_string()))?;
                operators.push(descriptor);
            }
        }
        if let Some(Aggregate::CountStar) = aggregate {
            operators.push(OperatorDescriptor::row_count());
        }
        operators.sort_by_key(|op| op.priority);

        let projection = if columns.is_empty() {
            Projection::all_columns(self.mapping)
        } else {
            Projection::build(self.mapping, columns)?
        };

        Ok(ScanPlan {
            ranges,
            residual,
            operators,
            projection,
            aggregate,
        })
    }

    /// Translates a filter into `(ranges, residual flag)`.
    ///
    /// With no filter at all the scan is unbounded and nothing is residual;
    /// a filter that produces no ranges keeps the unbounded accumulator and
    /// raises the flag, so filtering happens entirely at the store tier.
    pub fn plan_ranges(&self, filter: Option<&Filter>) -> PlanResult<(RangeSet, bool)> {
        match filter {
            None => Ok((RangeSet::universe(), false)),
            Some(f) => self.walk(f),
        }
    }

    fn walk(&self, filter: &Filter) -> PlanResult<(RangeSet, bool)> {
        match filter {
            Filter::Compare { column, op, value } if self.is_key(column) => {
                self.plan_comparison(*op, value)
            }
            Filter::In {
                column,
                values,
                negated,
            } if self.is_key(column) => self.plan_in_list(values, *negated),
            Filter::And(left, right) => {
                let (lr, lres) = self.walk(left)?;
                let (rr, rres) = self.walk(right)?;
                Ok((lr.intersect(&rr), lres || rres))
            }
            Filter::Or(left, right) => {
                let (lr, lres) = self.walk(left)?;
                let (rr, rres) = self.walk(right)?;
                Ok((lr.union(rr), lres || rres))
            }
            // IS NULL, LIKE, comparisons off the key, and anything the
            // planner does not recognize: full accumulator, residual.
            _ => Ok((RangeSet::universe(), true)),
        }
    }

    fn plan_comparison(&self, op: CompareOp, value: &TypedValue) -> PlanResult<(RangeSet, bool)> {
        // A comparison with NULL is never true.
        if value.is_null() {
            return Ok((RangeSet::empty(), false));
        }
        let key = encode_key(value).map_err(PlanError::key_encoding)?;
        let ranges = match op {
            CompareOp::Eq => vec![KeyRange::single_row(&key)],
            CompareOp::Ne => vec![KeyRange::less_than(&key), KeyRange::strictly_after(&key)],
            CompareOp::Lt => vec![KeyRange::less_than(&key)],
            CompareOp::Le => vec![KeyRange::at_most(&key)],
            CompareOp::Gt => vec![KeyRange::strictly_after(&key)],
            CompareOp::Ge => vec![KeyRange::at_least(&key)],
        };
        Ok((RangeSet::of(ranges), false))
    }

    fn plan_in_list(&self, values: &[TypedValue], negated: bool) -> PlanResult<(RangeSet, bool)> {
        // NULL can never match; in the negated form its presence makes the
        // whole predicate never true.
        if negated && values.iter().any(TypedValue::is_null) {
            return Ok((RangeSet::empty(), false));
        }
        let mut keys = Vec::with_capacity(values.len());
        for value in values.iter().filter(|v| !v.is_null()) {
            keys.push(encode_key(value).map_err(PlanError::key_encoding)?);
        }
        keys.sort();
        keys.dedup();

        if !negated {
            let ranges = keys.iter().map(|k| KeyRange::single_row(k)).collect();
            return Ok((RangeSet::of(ranges), false));
        }

        // Complement from first principles: (-inf, k0), then the stretch
        // between each follower and the next value, then (kn, +inf).
        if keys.is_empty() {
            return Ok((RangeSet::universe(), false));
        }
        let mut ranges = vec![KeyRange::less_than(&keys[0])];
        for pair in keys.windows(2) {
            ranges.push(KeyRange {
                start: Some(crate::codec::following_row(&pair[0])),
                start_inclusive: true,
                end: Some(pair[1].clone()),
                end_inclusive: false,
            });
        }
        ranges.push(KeyRange::strictly_after(&keys[keys.len() - 1]));
        Ok((RangeSet::of(ranges), false))
    }

    fn is_key(&self, column: &str) -> bool {
        self.mapping.is_row_key_name(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnBinding, ColumnDef, TableMapping};
    use crate::types::{TypeTag, TypedValue};

    fn mapping() -> TableMapping {
        TableMapping::new(
            "t",
            vec![
                ColumnDef::row_key("id", TypeTag::String),
                ColumnDef::new("name", TypeTag::String, ColumnBinding::value("cf", "name")),
            ],
            vec!["id".into()],
        )
        .unwrap()
    }

    fn s(v: &str) -> TypedValue {
        TypedValue::String(v.into())
    }

    #[test]
    fn test_equality_single_row_range() {
        let m = mapping();
        let planner = Planner::new(&m);
        let (ranges, residual) = planner.plan_ranges(Some(&Filter::eq("id", s("7")))).unwrap();
        assert!(!residual);
        assert_eq!(ranges.ranges().len(), 1);
        assert!(ranges.contains(b"7"));
        assert!(!ranges.contains(b"7\x00"));
        assert!(!ranges.contains(b"8"));
    }

    #[test]
    fn test_inequality_splits() {
        let m = mapping();
        let planner = Planner::new(&m);
        let (ranges, residual) = planner.plan_ranges(Some(&Filter::ne("id", s("7")))).unwrap();
        assert!(!residual);
        assert_eq!(ranges.ranges().len(), 2);
        assert!(!ranges.contains(b"7"));
        assert!(ranges.contains(b"6"));
        assert!(ranges.contains(b"7\x00"));
    }

    #[test]
    fn test_non_key_predicate_goes_residual() {
        let m = mapping();
        let planner = Planner::new(&m);
        let (ranges, residual) = planner
            .plan_ranges(Some(&Filter::like("name", "A%")))
            .unwrap();
        assert!(residual);
        assert!(ranges.is_universe());
    }

    #[test]
    fn test_and_narrows_or_widens() {
        let m = mapping();
        let planner = Planner::new(&m);

        let and = Filter::and(Filter::ge("id", s("b")), Filter::lt("id", s("d")));
        let (ranges, _) = planner.plan_ranges(Some(&and)).unwrap();
        assert!(ranges.contains(b"c"));
        assert!(!ranges.contains(b"a"));
        assert!(!ranges.contains(b"d"));

        let or = Filter::or(Filter::eq("id", s("a")), Filter::eq("id", s("c")));
        let (ranges, _) = planner.plan_ranges(Some(&or)).unwrap();
        assert_eq!(ranges.ranges().len(), 2);
        assert!(ranges.contains(b"a"));
        assert!(ranges.contains(b"c"));
        assert!(!ranges.contains(b"b"));
    }

    #[test]
    fn test_or_with_residual_side_is_full_scan() {
        let m = mapping();
        let planner = Planner::new(&m);
        let f = Filter::or(Filter::eq("id", s("a")), Filter::like("name", "x%"));
        let (ranges, residual) = planner.plan_ranges(Some(&f)).unwrap();
        assert!(ranges.is_universe());
        assert!(residual);
    }

    #[test]
    fn test_in_list_one_range_per_value() {
        let m = mapping();
        let planner = Planner::new(&m);
        let f = Filter::in_list("id", vec![s("c"), s("a"), s("a")]);
        let (ranges, residual) = planner.plan_ranges(Some(&f)).unwrap();
        assert!(!residual);
        assert_eq!(ranges.ranges().len(), 2);
    }

    #[test]
    fn test_negated_in_complement() {
        let m = mapping();
        let planner = Planner::new(&m);
        let f = Filter::not_in_list("id", vec![s("b"), s("d")]);
        let (ranges, residual) = planner.plan_ranges(Some(&f)).unwrap();
        assert!(!residual);
        assert_eq!(ranges.ranges().len(), 3);
        for key in [&b"a"[..], b"b\x00", b"c", b"d\x00", b"e"] {
            assert!(ranges.contains(key), "{:?} should be covered", key);
        }
        assert!(!ranges.contains(b"b"));
        assert!(!ranges.contains(b"d"));
    }

    #[test]
    fn test_negated_in_boundary_shapes() {
        let m = mapping();
        let planner = Planner::new(&m);

        // Empty list: NOT IN () is always true.
        let (ranges, _) = planner
            .plan_ranges(Some(&Filter::not_in_list("id", vec![])))
            .unwrap();
        assert!(ranges.is_universe());

        // Single value: two open ends.
        let (ranges, _) = planner
            .plan_ranges(Some(&Filter::not_in_list("id", vec![s("m")])))
            .unwrap();
        assert_eq!(ranges.ranges().len(), 2);

        // Duplicates collapse before complementing.
        let (ranges, _) = planner
            .plan_ranges(Some(&Filter::not_in_list("id", vec![s("m"), s("m")])))
            .unwrap();
        assert_eq!(ranges.ranges().len(), 2);
    }

    #[test]
    fn test_null_comparison_yields_empty() {
        let m = mapping();
        let planner = Planner::new(&m);
        let (ranges, residual) = planner
            .plan_ranges(Some(&Filter::eq("id", TypedValue::Null)))
            .unwrap();
        assert!(ranges.is_empty());
        assert!(!residual);
    }

    #[test]
    fn test_plan_scan_attaches_residual_operator() {
        let m = mapping();
        let planner = Planner::new(&m);
        let plan = planner
            .plan_scan(&[], Some(&Filter::like("name", "A%")), None)
            .unwrap();
        assert!(plan.residual);
        assert_eq!(plan.operators.len(), 1);
    }

    #[test]
    fn test_plan_scan_count_star_registers_operator() {
        let m = mapping();
        let planner = Planner::new(&m);
        let plan = planner
            .plan_scan(&[], None, Some(Aggregate::CountStar))
            .unwrap();
        assert_eq!(plan.operators.len(), 1);
        assert!(!plan.residual);
    }

    #[test]
    fn test_rowid_alias_targets_key() {
        let m = mapping();
        let planner = Planner::new(&m);
        let (ranges, residual) = planner
            .plan_ranges(Some(&Filter::eq("rowid", s("9"))))
            .unwrap();
        assert!(!residual);
        assert!(ranges.contains(b"9"));
    }
}

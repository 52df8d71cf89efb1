//! Sorted key ranges
//!
//! A [`KeyRange`] is an interval over the store's byte-ordered row keys with
//! independent inclusive/exclusive flags per bound; `None` bounds are
//! unbounded. A [`RangeSet`] keeps ranges normalized: empty ranges dropped,
//! sorted by start, overlapping or contiguous ranges merged. The fully
//! unbounded range is the universal superset and short-circuits all others.

use std::cmp::Ordering;

use crate::codec::following_row;

/// One interval over byte-ordered row keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRange {
    /// Lower bound, None for unbounded
    pub start: Option<Vec<u8>>,
    /// Whether the lower bound itself is included
    pub start_inclusive: bool,
    /// Upper bound, None for unbounded
    pub end: Option<Vec<u8>>,
    /// Whether the upper bound itself is included
    pub end_inclusive: bool,
}

impl KeyRange {
    /// The unbounded range covering every key.
    pub fn unbounded() -> Self {
        Self {
            start: None,
            start_inclusive: false,
            end: None,
            end_inclusive: false,
        }
    }

    /// The range selecting exactly the row at `key`: `[key, key·0x00)`.
    pub fn single_row(key: &[u8]) -> Self {
        Self {
            start: Some(key.to_vec()),
            start_inclusive: true,
            end: Some(following_row(key)),
            end_inclusive: false,
        }
    }

    /// `(-inf, key)`
    pub fn less_than(key: &[u8]) -> Self {
        Self {
            start: None,
            start_inclusive: false,
            end: Some(key.to_vec()),
            end_inclusive: false,
        }
    }

    /// `(-inf, key]`
    pub fn at_most(key: &[u8]) -> Self {
        Self {
            start: None,
            start_inclusive: false,
            end: Some(key.to_vec()),
            end_inclusive: true,
        }
    }

    /// `[key, +inf)`
    pub fn at_least(key: &[u8]) -> Self {
        Self {
            start: Some(key.to_vec()),
            start_inclusive: true,
            end: None,
            end_inclusive: false,
        }
    }

    /// Every key strictly above `key`, in canonical form `[key·0x00, +inf)`.
    pub fn strictly_after(key: &[u8]) -> Self {
        Self::at_least(&following_row(key))
    }

    /// Returns true if both bounds are absent.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Returns true if no key can satisfy both bounds.
    pub fn is_empty(&self) -> bool {
        match (&self.start, &self.end) {
            (Some(s), Some(e)) => match s.cmp(e) {
                Ordering::Greater => true,
                Ordering::Equal => !(self.start_inclusive && self.end_inclusive),
                Ordering::Less => false,
            },
            _ => false,
        }
    }

    /// Returns true if `key` lies inside the range.
    pub fn contains(&self, key: &[u8]) -> bool {
        let above_start = match &self.start {
            None => true,
            Some(s) => {
                if self.start_inclusive {
                    key >= s.as_slice()
                } else {
                    key > s.as_slice()
                }
            }
        };
        let below_end = match &self.end {
            None => true,
            Some(e) => {
                if self.end_inclusive {
                    key <= e.as_slice()
                } else {
                    key < e.as_slice()
                }
            }
        };
        above_start && below_end
    }

    /// Intersects two ranges; None when they do not overlap.
    pub fn intersect(&self, other: &KeyRange) -> Option<KeyRange> {
        let (start, start_inclusive) = match cmp_start(self, other) {
            Ordering::Less => (other.start.clone(), other.start_inclusive),
            _ => (self.start.clone(), self.start_inclusive),
        };
        let (end, end_inclusive) = match cmp_end(self, other) {
            Ordering::Greater => (other.end.clone(), other.end_inclusive),
            _ => (self.end.clone(), self.end_inclusive),
        };
        let result = KeyRange {
            start,
            start_inclusive,
            end,
            end_inclusive,
        };
        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    /// Returns true if `other` overlaps this range or continues it with no
    /// gap, assuming `other` does not start before this range.
    fn joins(&self, other: &KeyRange) -> bool {
        let Some(end) = &self.end else {
            return true;
        };
        let Some(start) = &other.start else {
            return true;
        };
        match start.cmp(end) {
            Ordering::Less => true,
            Ordering::Equal => self.end_inclusive || other.start_inclusive,
            // [.., k] followed by [k·0x00, ..) leaves no key uncovered.
            Ordering::Greater => self.end_inclusive && *start == following_row(end),
        }
    }
}

/// Compares lower bounds; None sorts first. At equal keys an inclusive
/// bound starts earlier than an exclusive one.
fn cmp_start(a: &KeyRange, b: &KeyRange) -> Ordering {
    match (&a.start, &b.start) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.cmp(y).then(match (a.start_inclusive, b.start_inclusive) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => Ordering::Equal,
        }),
    }
}

/// Compares upper bounds; None sorts last. At equal keys an exclusive bound
/// ends earlier than an inclusive one.
fn cmp_end(a: &KeyRange, b: &KeyRange) -> Ordering {
    match (&a.end, &b.end) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => x.cmp(y).then(match (a.end_inclusive, b.end_inclusive) {
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            _ => Ordering::Equal,
        }),
    }
}

/// A normalized union of key ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSet {
    ranges: Vec<KeyRange>,
}

impl RangeSet {
    /// The set covering every key.
    pub fn universe() -> Self {
        Self {
            ranges: vec![KeyRange::unbounded()],
        }
    }

    /// The set covering no key.
    pub fn empty() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Builds a normalized set from arbitrary ranges.
    pub fn of(ranges: Vec<KeyRange>) -> Self {
        Self {
            ranges: normalize(ranges),
        }
    }

    /// Returns the normalized ranges, sorted and disjoint.
    pub fn ranges(&self) -> &[KeyRange] {
        &self.ranges
    }

    /// Consumes the set, yielding its ranges.
    pub fn into_ranges(self) -> Vec<KeyRange> {
        self.ranges
    }

    /// Returns true if the set covers every key.
    pub fn is_universe(&self) -> bool {
        self.ranges.len() == 1 && self.ranges[0].is_unbounded()
    }

    /// Returns true if the set covers no key.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Returns true if any range contains `key`.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.ranges.iter().any(|r| r.contains(key))
    }

    /// Union of two sets, merged for overlap.
    pub fn union(mut self, other: RangeSet) -> RangeSet {
        if self.is_universe() || other.is_universe() {
            return RangeSet::universe();
        }
        self.ranges.extend(other.ranges);
        RangeSet::of(self.ranges)
    }

    /// Intersection of two sets.
    pub fn intersect(&self, other: &RangeSet) -> RangeSet {
        if self.is_universe() {
            return other.clone();
        }
        if other.is_universe() {
            return self.clone();
        }
        let mut out = Vec::new();
        for a in &self.ranges {
            for b in &other.ranges {
                if let Some(r) = a.intersect(b) {
                    out.push(r);
                }
            }
        }
        RangeSet::of(out)
    }
}

/// Drops empty ranges, sorts by start, merges overlap and contiguity.
fn normalize(mut ranges: Vec<KeyRange>) -> Vec<KeyRange> {
    ranges.retain(|r| !r.is_empty());
    if ranges.iter().any(KeyRange::is_unbounded) {
        return vec![KeyRange::unbounded()];
    }
    ranges.sort_by(|a, b| cmp_start(a, b).then_with(|| cmp_end(a, b)));

    let mut merged: Vec<KeyRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if last.joins(&range) => {
                if cmp_end(&range, last) == Ordering::Greater {
                    last.end = range.end;
                    last.end_inclusive = range.end_inclusive;
                }
            }
            _ => merged.push(range),
        }
    }
    merged
}

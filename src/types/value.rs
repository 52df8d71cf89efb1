//! Typed relational values
//!
//! `TypedValue` is the single value representation flowing through the
//! translator: literals in predicates, decoded cells, mutation inputs.
//! Relational comparison is defined per type; cross-type comparison is
//! only defined between Int and Double.

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Type tag for a relational value.
///
/// Tags are carried in column metadata and operator option maps so that
/// decoding never depends on runtime type inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Bool,
    Int,
    Double,
    /// Arbitrary-precision decimal in canonical string form.
    Decimal,
    String,
    Date,
    Timestamp,
    Bytes,
}

impl TypeTag {
    /// Returns the tag name used in metadata and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::Double => "double",
            TypeTag::Decimal => "decimal",
            TypeTag::String => "string",
            TypeTag::Date => "date",
            TypeTag::Timestamp => "timestamp",
            TypeTag::Bytes => "bytes",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed relational value.
///
/// `Null` is typeless; all other variants map 1:1 to a [`TypeTag`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypedValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    /// Canonical string form, e.g. "-12.50". Compared numerically where
    /// possible, lexicographically otherwise.
    Decimal(String),
    String(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    Bytes(Vec<u8>),
}

impl TypedValue {
    /// Returns the type tag, or None for Null.
    pub fn tag(&self) -> Option<TypeTag> {
        match self {
            TypedValue::Null => None,
            TypedValue::Bool(_) => Some(TypeTag::Bool),
            TypedValue::Int(_) => Some(TypeTag::Int),
            TypedValue::Double(_) => Some(TypeTag::Double),
            TypedValue::Decimal(_) => Some(TypeTag::Decimal),
            TypedValue::String(_) => Some(TypeTag::String),
            TypedValue::Date(_) => Some(TypeTag::Date),
            TypedValue::Timestamp(_) => Some(TypeTag::Timestamp),
            TypedValue::Bytes(_) => Some(TypeTag::Bytes),
        }
    }

    /// Returns true if this value is Null.
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    /// Relational comparison between two values of the same type.
    ///
    /// Returns None when the comparison is undefined: either operand is
    /// Null, or the types differ (except Int vs Double, compared as f64).
    pub fn relational_cmp(&self, other: &TypedValue) -> Option<Ordering> {
        use TypedValue::*;
        match (self, other) {
            (Null, _) | (_, Null) => None,
            (Bool(a), Bool(b)) => Some(a.cmp(b)),
            (Int(a), Int(b)) => Some(a.cmp(b)),
            (Double(a), Double(b)) => a.partial_cmp(b),
            (Int(a), Double(b)) => (*a as f64).partial_cmp(b),
            (Double(a), Int(b)) => a.partial_cmp(&(*b as f64)),
            (Decimal(a), Decimal(b)) => Some(cmp_decimal(a, b)),
            (String(a), String(b)) => Some(a.cmp(b)),
            (Date(a), Date(b)) => Some(a.cmp(b)),
            (Timestamp(a), Timestamp(b)) => Some(a.cmp(b)),
            (Bytes(a), Bytes(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Null => write!(f, "null"),
            TypedValue::Bool(v) => write!(f, "{}", v),
            TypedValue::Int(v) => write!(f, "{}", v),
            TypedValue::Double(v) => write!(f, "{}", v),
            TypedValue::Decimal(v) => write!(f, "{}", v),
            TypedValue::String(v) => write!(f, "{}", v),
            TypedValue::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            TypedValue::Timestamp(v) => {
                write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.9f"))
            }
            TypedValue::Bytes(v) => write!(f, "{} bytes", v.len()),
        }
    }
}

/// Numeric comparison of canonical decimal strings, falling back to
/// lexicographic order when either side fails to parse.
fn cmp_decimal(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or_else(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_mapping() {
        assert_eq!(TypedValue::Int(1).tag(), Some(TypeTag::Int));
        assert_eq!(TypedValue::Null.tag(), None);
        assert_eq!(TypeTag::Timestamp.as_str(), "timestamp");
    }

    #[test]
    fn test_same_type_comparison() {
        let a = TypedValue::String("apple".into());
        let b = TypedValue::String("banana".into());
        assert_eq!(a.relational_cmp(&b), Some(Ordering::Less));

        let x = TypedValue::Int(10);
        let y = TypedValue::Int(9);
        assert_eq!(x.relational_cmp(&y), Some(Ordering::Greater));
    }

    #[test]
    fn test_int_double_cross_comparison() {
        let i = TypedValue::Int(2);
        let d = TypedValue::Double(2.5);
        assert_eq!(i.relational_cmp(&d), Some(Ordering::Less));
        assert_eq!(d.relational_cmp(&i), Some(Ordering::Greater));
    }

    #[test]
    fn test_null_never_compares() {
        assert_eq!(TypedValue::Null.relational_cmp(&TypedValue::Int(1)), None);
        assert_eq!(TypedValue::Int(1).relational_cmp(&TypedValue::Null), None);
    }

    #[test]
    fn test_decimal_numeric_order() {
        let a = TypedValue::Decimal("9".into());
        let b = TypedValue::Decimal("10".into());
        assert_eq!(a.relational_cmp(&b), Some(Ordering::Less));
    }

    #[test]
    fn test_mismatched_types_undefined() {
        let s = TypedValue::String("1".into());
        let i = TypedValue::Int(1);
        assert_eq!(s.relational_cmp(&i), None);
    }
}

//! Opaque payload codec
//!
//! Serializes typed values for storage in cell values (or qualifiers, for
//! QUALIFIER-slot columns). Scalars round-trip through a canonical string
//! form; byte values are stored raw. The encoding is dense but carries no
//! ordering guarantee; scan boundaries use the `ordered` codec instead.
//!
//! Null and the empty byte sequence are equivalent: `serialize(Null)` is
//! empty, and deserializing an empty slice yields Null for every type.
//! "No value present" is represented by `Option::None` at call sites, not
//! by a byte pattern.

use chrono::{NaiveDate, NaiveDateTime};

use crate::types::{TypeTag, TypedValue};

use super::errors::{CodecError, CodecResult};

/// Timestamp format with fixed nanosecond precision so parsing is the exact
/// inverse of formatting.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Serializes a typed value to its opaque payload form.
pub fn serialize(value: &TypedValue) -> Vec<u8> {
    match value {
        TypedValue::Null => Vec::new(),
        TypedValue::Bool(v) => {
            if *v {
                b"true".to_vec()
            } else {
                b"false".to_vec()
            }
        }
        TypedValue::Int(v) => v.to_string().into_bytes(),
        TypedValue::Double(v) => v.to_string().into_bytes(),
        TypedValue::Decimal(v) => v.clone().into_bytes(),
        TypedValue::String(v) => v.clone().into_bytes(),
        TypedValue::Date(v) => v.format(DATE_FORMAT).to_string().into_bytes(),
        TypedValue::Timestamp(v) => v.format(TIMESTAMP_FORMAT).to_string().into_bytes(),
        TypedValue::Bytes(v) => v.clone(),
    }
}

/// Deserializes an opaque payload against a declared type.
///
/// The empty slice decodes to Null for every type.
pub fn deserialize(bytes: &[u8], expected: TypeTag) -> CodecResult<TypedValue> {
    if bytes.is_empty() {
        return Ok(TypedValue::Null);
    }
    match expected {
        TypeTag::Bytes => Ok(TypedValue::Bytes(bytes.to_vec())),
        _ => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| CodecError::decode(expected, bytes, e.to_string()))?;
            parse_scalar(text, expected, bytes)
        }
    }
}

fn parse_scalar(text: &str, expected: TypeTag, bytes: &[u8]) -> CodecResult<TypedValue> {
    match expected {
        TypeTag::Bool => match text {
            "true" => Ok(TypedValue::Bool(true)),
            "false" => Ok(TypedValue::Bool(false)),
            _ => Err(CodecError::decode(expected, bytes, "not a boolean literal")),
        },
        TypeTag::Int => text
            .parse::<i64>()
            .map(TypedValue::Int)
            .map_err(|e| CodecError::decode(expected, bytes, e.to_string())),
        TypeTag::Double => text
            .parse::<f64>()
            .map(TypedValue::Double)
            .map_err(|e| CodecError::decode(expected, bytes, e.to_string())),
        TypeTag::Decimal => Ok(TypedValue::Decimal(text.to_string())),
        TypeTag::String => Ok(TypedValue::String(text.to_string())),
        TypeTag::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(TypedValue::Date)
            .map_err(|e| CodecError::decode(expected, bytes, e.to_string())),
        TypeTag::Timestamp => NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
            .map(TypedValue::Timestamp)
            .map_err(|e| CodecError::decode(expected, bytes, e.to_string())),
        TypeTag::Bytes => unreachable!("bytes handled by caller"),
    }
}

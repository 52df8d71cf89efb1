//! Order-preserving key codec
//!
//! Encodes typed values so that unsigned byte-lexicographic comparison of
//! the encodings matches relational comparison of the values, per type:
//!
//! - Bool: one byte, 0 or 1
//! - Int, Date, Timestamp: 64-bit big-endian with the sign bit flipped
//! - Double: IEEE-754 bits, negatives fully inverted, positives sign-flipped
//! - String, Decimal: canonical UTF-8 text
//! - Bytes: raw
//!
//! The contract is monotonicity, not reversibility; `decode_key` happens to
//! invert every variant above and is used only to read the rowid column
//! back out of a scanned row key.

use chrono::{DateTime, Datelike, NaiveDate};

use crate::types::{TypeTag, TypedValue};

use super::errors::{CodecError, CodecResult};

/// Encodes a value as an order-preserving row-key / range-boundary byte
/// sequence.
///
/// Null has no position in the key order and is rejected.
pub fn encode_key(value: &TypedValue) -> CodecResult<Vec<u8>> {
    match value {
        TypedValue::Null => Err(CodecError::encode(TypeTag::Bytes, "null")),
        TypedValue::Bool(v) => Ok(vec![u8::from(*v)]),
        TypedValue::Int(v) => Ok(flip_i64(*v).to_be_bytes().to_vec()),
        TypedValue::Double(v) => Ok(order_f64_bits(*v).to_be_bytes().to_vec()),
        TypedValue::Decimal(v) => Ok(v.clone().into_bytes()),
        TypedValue::String(v) => Ok(v.clone().into_bytes()),
        TypedValue::Date(v) => Ok(flip_i64(i64::from(v.num_days_from_ce()))
            .to_be_bytes()
            .to_vec()),
        TypedValue::Timestamp(v) => Ok(flip_i64(v.and_utc().timestamp_millis())
            .to_be_bytes()
            .to_vec()),
        TypedValue::Bytes(v) => Ok(v.clone()),
    }
}

/// Decodes a row key back into a typed value.
///
/// Timestamps lose sub-millisecond precision through the key form; the
/// opaque codec is the authoritative payload representation.
pub fn decode_key(bytes: &[u8], expected: TypeTag) -> CodecResult<TypedValue> {
    match expected {
        TypeTag::Bool => match bytes {
            [0] => Ok(TypedValue::Bool(false)),
            [1] => Ok(TypedValue::Bool(true)),
            _ => Err(CodecError::decode(expected, bytes, "not a key-form bool")),
        },
        TypeTag::Int => Ok(TypedValue::Int(unflip_i64(read_u64(expected, bytes)?))),
        TypeTag::Double => {
            let bits = read_u64(expected, bytes)?;
            Ok(TypedValue::Double(f64::from_bits(unorder_f64_bits(bits))))
        }
        TypeTag::Decimal => Ok(TypedValue::Decimal(read_utf8(expected, bytes)?)),
        TypeTag::String => Ok(TypedValue::String(read_utf8(expected, bytes)?)),
        TypeTag::Date => {
            let days = unflip_i64(read_u64(expected, bytes)?);
            let days = i32::try_from(days)
                .map_err(|_| CodecError::decode(expected, bytes, "day count out of range"))?;
            NaiveDate::from_num_days_from_ce_opt(days)
                .map(TypedValue::Date)
                .ok_or_else(|| CodecError::decode(expected, bytes, "day count out of range"))
        }
        TypeTag::Timestamp => {
            let millis = unflip_i64(read_u64(expected, bytes)?);
            DateTime::from_timestamp_millis(millis)
                .map(|dt| TypedValue::Timestamp(dt.naive_utc()))
                .ok_or_else(|| CodecError::decode(expected, bytes, "millis out of range"))
        }
        TypeTag::Bytes => Ok(TypedValue::Bytes(bytes.to_vec())),
    }
}

/// Returns the least row key strictly greater than `key`: the key followed
/// by a single zero byte. `[key, following_row(key))` selects exactly the
/// row at `key`.
pub fn following_row(key: &[u8]) -> Vec<u8> {
    let mut next = Vec::with_capacity(key.len() + 1);
    next.extend_from_slice(key);
    next.push(0);
    next
}

/// Maps i64 onto u64 preserving order: flip the sign bit.
fn flip_i64(v: i64) -> u64 {
    (v as u64) ^ (1 << 63)
}

fn unflip_i64(v: u64) -> i64 {
    (v ^ (1 << 63)) as i64
}

/// Maps f64 bits onto a total order: negatives invert all bits, others flip
/// the sign bit.
fn order_f64_bits(v: f64) -> u64 {
    let bits = v.to_bits();
    if bits >> 63 == 1 {
        !bits
    } else {
        bits ^ (1 << 63)
    }
}

fn unorder_f64_bits(ordered: u64) -> u64 {
    if ordered >> 63 == 1 {
        ordered ^ (1 << 63)
    } else {
        !ordered
    }
}

fn read_u64(expected: TypeTag, bytes: &[u8]) -> CodecResult<u64> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| CodecError::decode(expected, bytes, "expected 8 key bytes"))?;
    Ok(u64::from_be_bytes(arr))
}

fn read_utf8(expected: TypeTag, bytes: &[u8]) -> CodecResult<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| CodecError::decode(expected, bytes, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn assert_ordered(a: TypedValue, b: TypedValue) {
        let ea = encode_key(&a).unwrap();
        let eb = encode_key(&b).unwrap();
        assert!(ea < eb, "{:?} should encode below {:?}", a, b);
    }

    #[test]
    fn test_int_ordering_across_sign() {
        assert_ordered(TypedValue::Int(-1), TypedValue::Int(0));
        assert_ordered(TypedValue::Int(i64::MIN), TypedValue::Int(-1));
        assert_ordered(TypedValue::Int(1), TypedValue::Int(i64::MAX));
    }

    #[test]
    fn test_double_ordering_across_sign() {
        assert_ordered(TypedValue::Double(-1.5), TypedValue::Double(-0.5));
        assert_ordered(TypedValue::Double(-0.5), TypedValue::Double(0.0));
        assert_ordered(TypedValue::Double(0.0), TypedValue::Double(2.25));
    }

    #[test]
    fn test_temporal_ordering() {
        let d1 = NaiveDate::from_ymd_opt(1969, 7, 20).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_ordered(TypedValue::Date(d1), TypedValue::Date(d2));
        assert_ordered(
            TypedValue::Timestamp(d1.and_hms_opt(0, 0, 0).unwrap()),
            TypedValue::Timestamp(d1.and_hms_opt(0, 0, 1).unwrap()),
        );
    }

    #[test]
    fn test_key_decode_inverts_encode() {
        let values = [
            TypedValue::Bool(true),
            TypedValue::Int(-42),
            TypedValue::Double(3.75),
            TypedValue::String("7".into()),
            TypedValue::Date(NaiveDate::from_ymd_opt(2001, 9, 9).unwrap()),
            TypedValue::Bytes(vec![9, 8, 7]),
        ];
        for v in values {
            let tag = v.tag().unwrap();
            let key = encode_key(&v).unwrap();
            assert_eq!(decode_key(&key, tag).unwrap(), v);
        }
    }

    #[test]
    fn test_following_row_is_immediate_successor() {
        let key = b"7".to_vec();
        let next = following_row(&key);
        assert_eq!(next, b"7\x00".to_vec());
        assert!(key < next);
        // Nothing sorts strictly between a key and its follower.
        assert!(next <= b"7\x00\x00".to_vec());
    }

    #[test]
    fn test_null_has_no_key_form() {
        assert!(encode_key(&TypedValue::Null).is_err());
    }
}

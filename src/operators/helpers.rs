//! Helper functions shared by operator implementations

use crate::error::{Error, Result};
use crate::types::{compare, DataType, Value};
use std::cmp::Ordering;

/// Unwrap a nullable type to get the inner type and a nullability flag
pub fn unwrap_nullable(dt: &DataType) -> (&DataType, bool) {
    match dt {
        DataType::Nullable(inner) => (&**inner, true),
        other => (other, false),
    }
}

/// Unwrap nullable types for a pair
pub fn unwrap_nullable_pair<'a>(
    left: &'a DataType,
    right: &'a DataType,
) -> (&'a DataType, &'a DataType, bool) {
    let (left_inner, left_null) = unwrap_nullable(left);
    let (right_inner, right_null) = unwrap_nullable(right);
    (left_inner, right_inner, left_null || right_null)
}

/// Wrap a type in Nullable if needed
pub fn wrap_nullable(dt: DataType, nullable: bool) -> DataType {
    if nullable {
        DataType::Nullable(Box::new(dt))
    } else {
        dt
    }
}

/// Validate a comparison operand pair and return the (possibly nullable)
/// BOOLEAN result type. Numeric operands always compare with promotion;
/// otherwise both sides must be in the same category (string, boolean,
/// temporal, or temporal vs string which is parsed at runtime).
pub fn validate_comparison(left: &DataType, right: &DataType) -> Result<DataType> {
    use DataType::*;

    let (l, r, nullable) = unwrap_nullable_pair(left, right);

    let comparable = match (l, r) {
        (Null, _) | (_, Null) => return Ok(Nullable(Box::new(Bool))),
        _ if l.is_numeric() && r.is_numeric() => true,
        (Str, Str) => true,
        (Bool, Bool) => true,
        _ if l.is_temporal() && (r == &Str || r == l) => true,
        _ if r.is_temporal() && l == &Str => true,
        _ => false,
    };

    if !comparable {
        return Err(Error::TypeMismatch {
            expected: l.to_string(),
            found: r.to_string(),
        });
    }
    Ok(wrap_nullable(Bool, nullable))
}

/// Compare two values for a comparison operator. Returns None when the
/// outcome is unknown: a NULL operand, or a tolerated string/numeric
/// comparison whose string side does not parse as a number.
pub fn compare_values(left: &Value, right: &Value) -> Result<Option<Ordering>> {
    if left.is_null() || right.is_null() {
        return Ok(None);
    }
    match compare(left, right) {
        Ok(ordering) => Ok(Some(ordering)),
        // Mismatch-tolerant comparison: parse the string side as a number.
        Err(Error::TypeMismatch { .. }) if string_numeric_pair(left, right) => {
            let (s, n, string_on_left) = match (left, right) {
                (Value::Str(s), n) => (s, n, true),
                (n, Value::Str(s)) => (s, n, false),
                _ => unreachable!(),
            };
            let Ok(parsed) = s.trim().parse::<f64>() else {
                return Ok(None);
            };
            let other = n.to_f64()?;
            let ordering = if string_on_left {
                parsed.partial_cmp(&other)
            } else {
                other.partial_cmp(&parsed)
            };
            Ok(ordering)
        }
        Err(err) => Err(err),
    }
}

/// Whether one side is a string and the other numeric.
pub fn string_numeric_pair(left: &Value, right: &Value) -> bool {
    (matches!(left, Value::Str(_)) && right.is_numeric())
        || (matches!(right, Value::Str(_)) && left.is_numeric())
}

/// Map a comparison outcome through a predicate on the ordering,
/// producing TRUE/FALSE or NULL for unknown.
pub fn ordering_to_value(ordering: Option<Ordering>, predicate: impl Fn(Ordering) -> bool) -> Value {
    match ordering {
        Some(ordering) => Value::Bool(predicate(ordering)),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_comparison() {
        assert_eq!(
            validate_comparison(&DataType::I32, &DataType::F64).unwrap(),
            DataType::Bool
        );
        assert_eq!(
            validate_comparison(&DataType::Str, &DataType::Str).unwrap(),
            DataType::Bool
        );
        assert!(validate_comparison(&DataType::Str, &DataType::I64).is_err());
        assert!(validate_comparison(&DataType::Geometry, &DataType::Geometry).is_err());
        // nullability propagates
        assert_eq!(
            validate_comparison(
                &DataType::Nullable(Box::new(DataType::I64)),
                &DataType::I32
            )
            .unwrap(),
            DataType::Nullable(Box::new(DataType::Bool))
        );
    }

    #[test]
    fn test_tolerant_string_numeric_compare() {
        assert_eq!(
            compare_values(&Value::Str("12".into()), &Value::I64(12)).unwrap(),
            Some(Ordering::Equal)
        );
        assert_eq!(
            compare_values(&Value::I64(5), &Value::Str("4.5".into())).unwrap(),
            Some(Ordering::Greater)
        );
        // unparseable string compares as unknown
        assert_eq!(
            compare_values(&Value::Str("twelve".into()), &Value::I64(12)).unwrap(),
            None
        );
    }

    #[test]
    fn test_null_compares_unknown() {
        assert_eq!(
            compare_values(&Value::Null, &Value::I64(1)).unwrap(),
            None
        );
    }
}

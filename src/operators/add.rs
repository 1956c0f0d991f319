//! Addition operator implementation

use super::helpers::*;
use super::traits::BinaryOperator;
use crate::error::{Error, Result};
use crate::types::data_type::promote_numeric_types;
use crate::types::{DataType, Value};

pub struct AddOperator;

impl BinaryOperator for AddOperator {
    fn name(&self) -> &'static str {
        "addition"
    }

    fn symbol(&self) -> &'static str {
        "+"
    }

    fn is_commutative(&self) -> bool {
        true
    }

    fn validate(&self, left: &DataType, right: &DataType) -> Result<DataType> {
        let (l, r, nullable) = unwrap_nullable_pair(left, right);
        validate_arithmetic_pair(l, r, nullable)
    }

    fn execute(&self, left: &Value, right: &Value) -> Result<Value> {
        arithmetic_op(left, right, "+", |a, b| a.checked_add(b), |a, b| a + b)
    }
}

/// Common arithmetic type validation: integer operands promote to the
/// wider integer, a float operand promotes to float, a NULL operand makes
/// the result nullable. Anything non-numeric is a mismatch.
pub(super) fn validate_arithmetic_pair(
    l: &DataType,
    r: &DataType,
    nullable: bool,
) -> Result<DataType> {
    use DataType::*;
    match (l, r) {
        (Null, Null) => Ok(Null),
        (Null, other) | (other, Null) if other.is_numeric() => {
            Ok(Nullable(Box::new(other.clone())))
        }
        _ => Ok(wrap_nullable(promote_numeric_types(l, r)?, nullable)),
    }
}

/// Common arithmetic execution: NULL propagates, integers use the checked
/// operation (widening I32 results that overflow), floats use the float
/// operation.
pub(super) fn arithmetic_op(
    left: &Value,
    right: &Value,
    symbol: &str,
    int_op: impl Fn(i64, i64) -> Option<i64>,
    float_op: impl Fn(f64, f64) -> f64,
) -> Result<Value> {
    use Value::*;
    Ok(match (left, right) {
        (Null, _) | (_, Null) => Null,
        (I32(a), I32(b)) => {
            let result = int_op(*a as i64, *b as i64)
                .ok_or_else(|| Error::InvalidValue(format!("integer overflow in {}", symbol)))?;
            match i32::try_from(result) {
                Ok(result) => I32(result),
                Err(_) => I64(result),
            }
        }
        (a, b) if a.is_integer() && b.is_integer() => {
            let result = int_op(a.to_i64()?, b.to_i64()?)
                .ok_or_else(|| Error::InvalidValue(format!("integer overflow in {}", symbol)))?;
            I64(result)
        }
        (a, b) if a.is_numeric() && b.is_numeric() => F64(float_op(a.to_f64()?, b.to_f64()?)),
        (a, b) => {
            return Err(Error::TypeMismatch {
                expected: "numeric values".into(),
                found: format!("{:?} {} {:?}", a, symbol, b),
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add() {
        let op = AddOperator;

        assert_eq!(
            op.validate(&DataType::I32, &DataType::I64).unwrap(),
            DataType::I64
        );
        assert_eq!(
            op.validate(&DataType::I64, &DataType::F64).unwrap(),
            DataType::F64
        );
        assert!(op.validate(&DataType::I32, &DataType::Str).is_err());

        assert_eq!(
            op.execute(&Value::I32(2), &Value::I32(3)).unwrap(),
            Value::I32(5)
        );
        assert_eq!(
            op.execute(&Value::I64(2), &Value::F64(0.5)).unwrap(),
            Value::F64(2.5)
        );
        assert_eq!(op.execute(&Value::Null, &Value::I32(1)).unwrap(), Value::Null);
    }

    #[test]
    fn test_add_i32_overflow_widens() {
        let op = AddOperator;
        assert_eq!(
            op.execute(&Value::I32(i32::MAX), &Value::I32(1)).unwrap(),
            Value::I64(i32::MAX as i64 + 1)
        );
    }
}

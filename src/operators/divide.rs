//! Division operator implementation

use super::add::{arithmetic_op, validate_arithmetic_pair};
use super::helpers::*;
use super::traits::BinaryOperator;
use crate::error::{Error, Result};
use crate::types::{DataType, Value};

pub struct DivideOperator;

impl BinaryOperator for DivideOperator {
    fn name(&self) -> &'static str {
        "division"
    }

    fn symbol(&self) -> &'static str {
        "/"
    }

    fn validate(&self, left: &DataType, right: &DataType) -> Result<DataType> {
        let (l, r, nullable) = unwrap_nullable_pair(left, right);
        validate_arithmetic_pair(l, r, nullable)
    }

    fn execute(&self, left: &Value, right: &Value) -> Result<Value> {
        // Guard integer division by zero; float division follows IEEE 754.
        if right.is_integer() && right.to_i64()? == 0 {
            return Err(Error::InvalidValue("division by zero".into()));
        }
        arithmetic_op(left, right, "/", |a, b| a.checked_div(b), |a, b| a / b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divide() {
        let op = DivideOperator;
        assert_eq!(
            op.execute(&Value::I64(7), &Value::I32(2)).unwrap(),
            Value::I64(3)
        );
        assert_eq!(
            op.execute(&Value::F64(7.0), &Value::I32(2)).unwrap(),
            Value::F64(3.5)
        );
        assert!(op.execute(&Value::I64(1), &Value::I32(0)).is_err());
    }
}

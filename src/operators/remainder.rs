//! Remainder operator implementation

use super::add::{arithmetic_op, validate_arithmetic_pair};
use super::helpers::*;
use super::traits::BinaryOperator;
use crate::error::{Error, Result};
use crate::types::{DataType, Value};

pub struct RemainderOperator;

impl BinaryOperator for RemainderOperator {
    fn name(&self) -> &'static str {
        "remainder"
    }

    fn symbol(&self) -> &'static str {
        "%"
    }

    fn validate(&self, left: &DataType, right: &DataType) -> Result<DataType> {
        let (l, r, nullable) = unwrap_nullable_pair(left, right);
        validate_arithmetic_pair(l, r, nullable)
    }

    fn execute(&self, left: &Value, right: &Value) -> Result<Value> {
        if right.is_integer() && right.to_i64()? == 0 {
            return Err(Error::InvalidValue("division by zero".into()));
        }
        arithmetic_op(left, right, "%", |a, b| a.checked_rem(b), |a, b| a % b)
    }
}

//! Subtraction operator implementation

use super::add::{arithmetic_op, validate_arithmetic_pair};
use super::helpers::*;
use super::traits::BinaryOperator;
use crate::error::Result;
use crate::types::{DataType, Value};

pub struct SubtractOperator;

impl BinaryOperator for SubtractOperator {
    fn name(&self) -> &'static str {
        "subtraction"
    }

    fn symbol(&self) -> &'static str {
        "-"
    }

    fn validate(&self, left: &DataType, right: &DataType) -> Result<DataType> {
        let (l, r, nullable) = unwrap_nullable_pair(left, right);
        validate_arithmetic_pair(l, r, nullable)
    }

    fn execute(&self, left: &Value, right: &Value) -> Result<Value> {
        arithmetic_op(left, right, "-", |a, b| a.checked_sub(b), |a, b| a - b)
    }
}

//! Equality comparison operator implementation

use super::helpers::*;
use super::traits::BinaryOperator;
use crate::error::Result;
use crate::types::{DataType, Value};
use std::cmp::Ordering;

pub struct EqualOperator;

impl BinaryOperator for EqualOperator {
    fn name(&self) -> &'static str {
        "equality comparison"
    }

    fn symbol(&self) -> &'static str {
        "="
    }

    fn is_commutative(&self) -> bool {
        true
    }

    fn validate(&self, left: &DataType, right: &DataType) -> Result<DataType> {
        validate_comparison(left, right)
    }

    fn execute(&self, left: &Value, right: &Value) -> Result<Value> {
        Ok(ordering_to_value(compare_values(left, right)?, |o| {
            o == Ordering::Equal
        }))
    }
}

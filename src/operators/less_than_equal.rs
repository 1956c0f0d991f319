//! Less-than-or-equal comparison operator implementation

use super::helpers::*;
use super::traits::BinaryOperator;
use crate::error::Result;
use crate::types::{DataType, Value};
use std::cmp::Ordering;

pub struct LessThanEqualOperator;

impl BinaryOperator for LessThanEqualOperator {
    fn name(&self) -> &'static str {
        "less-than-or-equal comparison"
    }

    fn symbol(&self) -> &'static str {
        "<="
    }

    fn validate(&self, left: &DataType, right: &DataType) -> Result<DataType> {
        validate_comparison(left, right)
    }

    fn execute(&self, left: &Value, right: &Value) -> Result<Value> {
        Ok(ordering_to_value(compare_values(left, right)?, |o| {
            o != Ordering::Greater
        }))
    }
}

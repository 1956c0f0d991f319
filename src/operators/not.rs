//! NOT logical operator implementation

use super::helpers::*;
use super::traits::UnaryOperator;
use crate::error::{Error, Result};
use crate::types::{DataType, Value};

pub struct NotOperator;

impl UnaryOperator for NotOperator {
    fn name(&self) -> &'static str {
        "logical NOT"
    }

    fn symbol(&self) -> &'static str {
        "NOT"
    }

    fn validate(&self, operand: &DataType) -> Result<DataType> {
        use DataType::*;

        let (inner, nullable) = unwrap_nullable(operand);
        match inner {
            Bool | Null => Ok(wrap_nullable(Bool, nullable)),
            _ => Err(Error::TypeMismatch {
                expected: "BOOLEAN".into(),
                found: operand.to_string(),
            }),
        }
    }

    fn execute(&self, operand: &Value) -> Result<Value> {
        match operand {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            Value::Null => Ok(Value::Null),
            other => Err(Error::TypeMismatch {
                expected: "BOOLEAN".into(),
                found: other.data_type().to_string(),
            }),
        }
    }
}

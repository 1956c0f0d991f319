//! Arithmetic negation operator implementation

use super::helpers::*;
use super::traits::UnaryOperator;
use crate::error::{Error, Result};
use crate::types::{DataType, Value};

pub struct NegateOperator;

impl UnaryOperator for NegateOperator {
    fn name(&self) -> &'static str {
        "negation"
    }

    fn symbol(&self) -> &'static str {
        "-"
    }

    fn validate(&self, operand: &DataType) -> Result<DataType> {
        let (inner, nullable) = unwrap_nullable(operand);
        if inner == &DataType::Null {
            return Ok(DataType::Null);
        }
        if !inner.is_numeric() {
            return Err(Error::TypeMismatch {
                expected: "numeric type".into(),
                found: operand.to_string(),
            });
        }
        Ok(wrap_nullable(inner.clone(), nullable))
    }

    fn execute(&self, operand: &Value) -> Result<Value> {
        Ok(match operand {
            Value::Null => Value::Null,
            Value::I32(v) => Value::I32(-v),
            Value::I64(v) => Value::I64(-v),
            Value::F64(v) => Value::F64(-v),
            other => {
                return Err(Error::TypeMismatch {
                    expected: "numeric value".into(),
                    found: other.data_type().to_string(),
                });
            }
        })
    }
}

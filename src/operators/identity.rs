//! Arithmetic identity (unary plus) operator implementation

use super::helpers::*;
use super::traits::UnaryOperator;
use crate::error::{Error, Result};
use crate::types::{DataType, Value};

pub struct IdentityOperator;

impl UnaryOperator for IdentityOperator {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn symbol(&self) -> &'static str {
        "+"
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
        match operand {
            Value::Null | Value::I32(_) | Value::I64(_) | Value::F64(_) => Ok(operand.clone()),
            other => Err(Error::TypeMismatch {
                expected: "numeric value".into(),
                found: other.data_type().to_string(),
            }),
        }
    }
}

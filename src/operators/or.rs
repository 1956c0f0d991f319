//! OR logical operator implementation

use super::helpers::*;
use super::traits::BinaryOperator;
use crate::error::{Error, Result};
use crate::types::{DataType, Value};

pub struct OrOperator;

impl BinaryOperator for OrOperator {
    fn name(&self) -> &'static str {
        "logical OR"
    }

    fn symbol(&self) -> &'static str {
        "OR"
    }

    fn is_commutative(&self) -> bool {
        true
    }

    fn validate(&self, left: &DataType, right: &DataType) -> Result<DataType> {
        use DataType::*;

        let (l, r, nullable) = unwrap_nullable_pair(left, right);
        match (l, r) {
            (Bool | Null, Bool | Null) => Ok(wrap_nullable(Bool, nullable)),
            _ => Err(Error::TypeMismatch {
                expected: "BOOLEAN".into(),
                found: format!("{} OR {}", left, right),
            }),
        }
    }

    fn execute(&self, left: &Value, right: &Value) -> Result<Value> {
        use Value::*;

        // Three-valued logic: TRUE dominates NULL.
        match (left, right) {
            (Bool(true), _) | (_, Bool(true)) => Ok(Bool(true)),
            (Bool(false), Bool(false)) => Ok(Bool(false)),
            (Bool(false), Null) | (Null, Bool(false)) | (Null, Null) => Ok(Null),
            _ => Err(Error::TypeMismatch {
                expected: "BOOLEAN".into(),
                found: format!("{:?} OR {:?}", left, right),
            }),
        }
    }
}

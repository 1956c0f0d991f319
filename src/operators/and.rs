//! AND logical operator implementation

use super::helpers::*;
use super::traits::BinaryOperator;
use crate::error::{Error, Result};
use crate::types::{DataType, Value};

pub struct AndOperator;

impl BinaryOperator for AndOperator {
    fn name(&self) -> &'static str {
        "logical AND"
    }

    fn symbol(&self) -> &'static str {
        "AND"
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
                found: format!("{} AND {}", left, right),
            }),
        }
    }

    fn execute(&self, left: &Value, right: &Value) -> Result<Value> {
        use Value::*;

        // Three-valued logic: FALSE dominates NULL.
        match (left, right) {
            (Bool(false), _) | (_, Bool(false)) => Ok(Bool(false)),
            (Bool(true), Bool(true)) => Ok(Bool(true)),
            (Bool(true), Null) | (Null, Bool(true)) | (Null, Null) => Ok(Null),
            _ => Err(Error::TypeMismatch {
                expected: "BOOLEAN".into(),
                found: format!("{:?} AND {:?}", left, right),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_truth_table() {
        let op = AndOperator;

        assert_eq!(
            op.execute(&Value::Bool(true), &Value::Bool(true)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            op.execute(&Value::Bool(true), &Value::Bool(false)).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            op.execute(&Value::Bool(false), &Value::Null).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            op.execute(&Value::Bool(true), &Value::Null).unwrap(),
            Value::Null
        );
        assert_eq!(op.execute(&Value::Null, &Value::Null).unwrap(), Value::Null);
    }
}

//! ILIKE case-insensitive pattern matching operator implementation

use super::like::{match_pattern, validate_like_pair};
use super::traits::BinaryOperator;
use crate::error::{Error, Result};
use crate::types::{DataType, Value};

pub struct ILikeOperator;

impl BinaryOperator for ILikeOperator {
    fn name(&self) -> &'static str {
        "case-insensitive pattern matching"
    }

    fn symbol(&self) -> &'static str {
        "ILIKE"
    }

    fn validate(&self, left: &DataType, right: &DataType) -> Result<DataType> {
        validate_like_pair(left, right, "ILIKE")
    }

    fn execute(&self, left: &Value, right: &Value) -> Result<Value> {
        match (left, right) {
            (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),
            (Value::Str(text), Value::Str(pattern)) => {
                Ok(Value::Bool(match_pattern(text, pattern, true)?))
            }
            _ => Err(Error::TypeMismatch {
                expected: "STRING values".into(),
                found: format!("{:?} ILIKE {:?}", left, right),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ilike() {
        let op = ILikeOperator;
        assert_eq!(
            op.execute(
                &Value::Str("san jose".into()),
                &Value::Str("SAN%".into())
            )
            .unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            op.execute(&Value::Str("Boston".into()), &Value::Str("san%".into()))
                .unwrap(),
            Value::Bool(false)
        );
    }
}

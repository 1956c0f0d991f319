//! CONCAT function - concatenates strings

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::data_type::DataType;
use crate::types::Value;

pub struct ConcatFunction;

impl Function for ConcatFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "CONCAT",
            is_aggregate: false,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        if arg_types.len() < 2 {
            return Err(Error::Execution(format!(
                "CONCAT takes at least 2 arguments, got {}",
                arg_types.len()
            )));
        }
        // String operands only; no implicit cast from other types.
        for arg in arg_types {
            match arg.base_type() {
                DataType::Str | DataType::Null => {}
                other => {
                    return Err(Error::TypeMismatch {
                        expected: "string type".into(),
                        found: other.to_string(),
                    });
                }
            }
        }
        Ok(DataType::Str)
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        let mut result = String::new();
        for arg in args {
            match arg {
                Value::Null => return Ok(Value::Null),
                Value::Str(s) => result.push_str(s),
                other => {
                    return Err(Error::TypeMismatch {
                        expected: "string value".into(),
                        found: other.data_type().to_string(),
                    });
                }
            }
        }
        Ok(Value::Str(result))
    }
}

/// Register the CONCAT function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(ConcatFunction));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat() {
        let func = ConcatFunction;
        assert_eq!(
            func.validate(&[DataType::Str, DataType::Str]).unwrap(),
            DataType::Str
        );
        assert!(func.validate(&[DataType::Str, DataType::I64]).is_err());
        assert!(func.validate(&[DataType::Str]).is_err());

        assert_eq!(
            func.execute(&[Value::string("San "), Value::string("Jose")])
                .unwrap(),
            Value::string("San Jose")
        );
        assert_eq!(
            func.execute(&[Value::string("a"), Value::Null]).unwrap(),
            Value::Null
        );
    }
}

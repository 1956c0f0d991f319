//! SUBSTR function - extracts a substring

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::data_type::DataType;
use crate::types::Value;

pub struct SubstrFunction;

impl Function for SubstrFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "SUBSTR",
            is_aggregate: false,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        // SUBSTR(string, start) or SUBSTR(string, start, length)
        if arg_types.len() < 2 || arg_types.len() > 3 {
            return Err(Error::Execution(format!(
                "SUBSTR takes 2 or 3 arguments, got {}",
                arg_types.len()
            )));
        }
        if !arg_types[0].base_type().is_string() {
            return Err(Error::TypeMismatch {
                expected: "string type".into(),
                found: arg_types[0].to_string(),
            });
        }
        for arg in &arg_types[1..] {
            if !arg.base_type().is_integer() {
                return Err(Error::TypeMismatch {
                    expected: "integer".into(),
                    found: arg.to_string(),
                });
            }
        }
        Ok(DataType::Str)
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        if args.iter().any(|v| v.is_null()) {
            return Ok(Value::Null);
        }

        let Value::Str(s) = &args[0] else {
            return Err(Error::TypeMismatch {
                expected: "string".into(),
                found: args[0].data_type().to_string(),
            });
        };
        let start = args[1].to_i64()?;
        let length = match args.get(2) {
            Some(v) => Some(v.to_i64()?),
            None => None,
        };

        let chars: Vec<char> = s.chars().collect();
        let len = chars.len() as i64;

        // 1-based SQL index; negative positions count from the end.
        let actual_start = if start > 0 {
            (start - 1) as usize
        } else if start < 0 {
            (len + start).max(0) as usize
        } else {
            0
        };

        if actual_start >= chars.len() {
            return Ok(Value::string(""));
        }

        let result: String = match length {
            Some(length) if length < 0 => {
                return Err(Error::Execution("SUBSTR length must be non-negative".into()));
            }
            Some(length) => {
                let end = (actual_start + length as usize).min(chars.len());
                chars[actual_start..end].iter().collect()
            }
            None => chars[actual_start..].iter().collect(),
        };

        Ok(Value::Str(result))
    }
}

/// Register the SUBSTR function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(SubstrFunction));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substr_validate() {
        let func = SubstrFunction;
        assert_eq!(
            func.validate(&[DataType::Str, DataType::I32]).unwrap(),
            DataType::Str
        );
        assert_eq!(
            func.validate(&[DataType::Str, DataType::I32, DataType::I64])
                .unwrap(),
            DataType::Str
        );
        assert!(func.validate(&[DataType::I32, DataType::I32]).is_err());
        assert!(func.validate(&[DataType::Str]).is_err());
    }

    #[test]
    fn test_substr_execute() {
        let func = SubstrFunction;

        assert_eq!(
            func.execute(&[Value::string("hello world"), Value::I32(7)])
                .unwrap(),
            Value::string("world")
        );
        assert_eq!(
            func.execute(&[Value::string("hello world"), Value::I32(1), Value::I32(5)])
                .unwrap(),
            Value::string("hello")
        );
        assert_eq!(
            func.execute(&[Value::string("hello"), Value::I32(10)]).unwrap(),
            Value::string("")
        );
        assert_eq!(
            func.execute(&[Value::string("hello"), Value::I32(-2)]).unwrap(),
            Value::string("lo")
        );
        assert_eq!(
            func.execute(&[Value::Null, Value::I32(1)]).unwrap(),
            Value::Null
        );
    }
}

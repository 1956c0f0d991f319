//! LENGTH function - string length in characters

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::data_type::DataType;
use crate::types::Value;

pub struct LengthFunction;

impl Function for LengthFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "LENGTH",
            is_aggregate: false,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        let [arg] = arg_types else {
            return Err(Error::Execution(format!(
                "LENGTH takes 1 argument, got {}",
                arg_types.len()
            )));
        };
        match arg.base_type() {
            DataType::Str | DataType::Null => Ok(DataType::I32),
            other => Err(Error::TypeMismatch {
                expected: "string type".into(),
                found: other.to_string(),
            }),
        }
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        match &args[..] {
            [Value::Null] => Ok(Value::Null),
            [Value::Str(s)] => Ok(Value::I32(s.chars().count() as i32)),
            _ => Err(Error::TypeMismatch {
                expected: "string value".into(),
                found: args.first().map(|v| v.data_type().to_string()).unwrap_or_default(),
            }),
        }
    }
}

/// Register the LENGTH function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(LengthFunction));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length() {
        let func = LengthFunction;
        assert_eq!(
            func.execute(&[Value::string("São Paulo")]).unwrap(),
            Value::I32(9)
        );
        assert_eq!(func.execute(&[Value::Null]).unwrap(), Value::Null);
    }
}

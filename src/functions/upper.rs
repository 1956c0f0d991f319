//! UPPER function - converts a string to uppercase

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::data_type::DataType;
use crate::types::Value;

pub struct UpperFunction;

impl Function for UpperFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "UPPER",
            is_aggregate: false,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        validate_single_string("UPPER", arg_types)
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        match &args[..] {
            [Value::Null] => Ok(Value::Null),
            [Value::Str(s)] => Ok(Value::Str(s.to_uppercase())),
            _ => Err(Error::TypeMismatch {
                expected: "string value".into(),
                found: args.first().map(|v| v.data_type().to_string()).unwrap_or_default(),
            }),
        }
    }
}

pub(super) fn validate_single_string(name: &str, arg_types: &[DataType]) -> Result<DataType> {
    let [arg] = arg_types else {
        return Err(Error::Execution(format!(
            "{} takes 1 argument, got {}",
            name,
            arg_types.len()
        )));
    };
    match arg.base_type() {
        DataType::Str | DataType::Null => Ok(DataType::Str),
        other => Err(Error::TypeMismatch {
            expected: "string type".into(),
            found: other.to_string(),
        }),
    }
}

/// Register the UPPER function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(UpperFunction));
}

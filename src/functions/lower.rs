//! LOWER function - converts a string to lowercase

use super::upper::validate_single_string;
use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::data_type::DataType;
use crate::types::Value;

pub struct LowerFunction;

impl Function for LowerFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "LOWER",
            is_aggregate: false,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        validate_single_string("LOWER", arg_types)
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        match &args[..] {
            [Value::Null] => Ok(Value::Null),
            [Value::Str(s)] => Ok(Value::Str(s.to_lowercase())),
            _ => Err(Error::TypeMismatch {
                expected: "string value".into(),
                found: args.first().map(|v| v.data_type().to_string()).unwrap_or_default(),
            }),
        }
    }
}

/// Register the LOWER function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(LowerFunction));
}

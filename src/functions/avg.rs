//! AVG aggregate function

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::data_type::DataType;
use crate::types::Value;

pub struct AvgFunction;

impl Function for AvgFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "AVG",
            is_aggregate: true,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        let [arg] = arg_types else {
            return Err(Error::Execution(format!(
                "AVG takes 1 argument, got {}",
                arg_types.len()
            )));
        };
        if !arg.is_numeric() {
            return Err(Error::TypeMismatch {
                expected: "numeric type".into(),
                found: arg.to_string(),
            });
        }
        Ok(DataType::F64)
    }

    fn execute(&self, _args: &[Value]) -> Result<Value> {
        Err(Error::Execution(
            "aggregate function AVG cannot be evaluated per record".into(),
        ))
    }
}

/// Register the AVG function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(AvgFunction));
}

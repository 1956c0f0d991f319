//! MAX aggregate function

use super::min::validate_minmax;
use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::data_type::DataType;
use crate::types::Value;

pub struct MaxFunction;

impl Function for MaxFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "MAX",
            is_aggregate: true,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        validate_minmax("MAX", arg_types)
    }

    fn execute(&self, _args: &[Value]) -> Result<Value> {
        Err(Error::Execution(
            "aggregate function MAX cannot be evaluated per record".into(),
        ))
    }
}

/// Register the MAX function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(MaxFunction));
}

//! COUNT aggregate function

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::data_type::DataType;
use crate::types::Value;

pub struct CountFunction;

impl Function for CountFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "COUNT",
            is_aggregate: true,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        // COUNT takes exactly one operand of any type; COUNT(*) reaches
        // the checker as a constant operand.
        if arg_types.len() != 1 {
            return Err(Error::Execution(format!(
                "COUNT takes 1 argument, got {}",
                arg_types.len()
            )));
        }
        Ok(DataType::I64)
    }

    fn execute(&self, _args: &[Value]) -> Result<Value> {
        Err(Error::Execution(
            "aggregate function COUNT cannot be evaluated per record".into(),
        ))
    }
}

/// Register the COUNT function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(CountFunction));
}

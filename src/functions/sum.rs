//! SUM aggregate function

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::data_type::DataType;
use crate::types::Value;

pub struct SumFunction;

impl Function for SumFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "SUM",
            is_aggregate: true,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        let [arg] = arg_types else {
            return Err(Error::Execution(format!(
                "SUM takes 1 argument, got {}",
                arg_types.len()
            )));
        };
        // Integer sums widen to BIGINT; float sums stay DOUBLE.
        match arg.base_type() {
            DataType::I32 | DataType::I64 => Ok(DataType::I64),
            DataType::F64 => Ok(DataType::F64),
            other => Err(Error::TypeMismatch {
                expected: "numeric type".into(),
                found: other.to_string(),
            }),
        }
    }

    fn execute(&self, _args: &[Value]) -> Result<Value> {
        Err(Error::Execution(
            "aggregate function SUM cannot be evaluated per record".into(),
        ))
    }
}

/// Register the SUM function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(SumFunction));
}

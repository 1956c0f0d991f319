//! MIN aggregate function

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::data_type::DataType;
use crate::types::Value;

pub struct MinFunction;

impl Function for MinFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "MIN",
            is_aggregate: true,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        validate_minmax("MIN", arg_types)
    }

    fn execute(&self, _args: &[Value]) -> Result<Value> {
        Err(Error::Execution(
            "aggregate function MIN cannot be evaluated per record".into(),
        ))
    }
}

/// MIN/MAX preserve the operand type; numeric, string and temporal
/// operands are ordered, geometry is not.
pub(super) fn validate_minmax(name: &str, arg_types: &[DataType]) -> Result<DataType> {
    let [arg] = arg_types else {
        return Err(Error::Execution(format!(
            "{} takes 1 argument, got {}",
            name,
            arg_types.len()
        )));
    };
    let base = arg.base_type();
    if base.is_numeric() || base.is_string() || base.is_temporal() {
        Ok(base.clone())
    } else {
        Err(Error::TypeMismatch {
            expected: "orderable type".into(),
            found: arg.to_string(),
        })
    }
}

/// Register the MIN function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(MinFunction));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minmax_validate() {
        assert_eq!(
            validate_minmax("MIN", &[DataType::F64]).unwrap(),
            DataType::F64
        );
        assert_eq!(
            validate_minmax("MIN", &[DataType::Str]).unwrap(),
            DataType::Str
        );
        assert_eq!(
            validate_minmax("MIN", &[DataType::Nullable(Box::new(DataType::I32))]).unwrap(),
            DataType::I32
        );
        assert!(validate_minmax("MIN", &[DataType::Geometry]).is_err());
        assert!(validate_minmax("MIN", &[DataType::I32, DataType::I32]).is_err());
    }
}

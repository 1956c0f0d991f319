//! COALESCE function - first non-NULL argument

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::data_type::DataType;
use crate::types::Value;

pub struct CoalesceFunction;

impl Function for CoalesceFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "COALESCE",
            is_aggregate: false,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        if arg_types.is_empty() {
            return Err(Error::Execution(
                "COALESCE takes at least 1 argument".into(),
            ));
        }
        // The result type is the first non-NULL argument type; all other
        // arguments must share its base type.
        let result = arg_types
            .iter()
            .map(|t| t.base_type())
            .find(|t| *t != &DataType::Null)
            .cloned()
            .unwrap_or(DataType::Null);
        for arg in arg_types {
            let base = arg.base_type();
            if base != &DataType::Null && base != &result {
                return Err(Error::TypeMismatch {
                    expected: result.to_string(),
                    found: base.to_string(),
                });
            }
        }
        Ok(DataType::Nullable(Box::new(result)))
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        Ok(args
            .iter()
            .find(|v| !v.is_null())
            .cloned()
            .unwrap_or(Value::Null))
    }
}

/// Register the COALESCE function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(CoalesceFunction));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coalesce() {
        let func = CoalesceFunction;
        assert_eq!(
            func.execute(&[Value::Null, Value::I64(5), Value::I64(7)])
                .unwrap(),
            Value::I64(5)
        );
        assert_eq!(func.execute(&[Value::Null, Value::Null]).unwrap(), Value::Null);
        assert!(func.validate(&[DataType::Null, DataType::Str, DataType::I32]).is_err());
    }
}

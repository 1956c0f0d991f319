//! GEOMFROMTEXT function - builds a geometry from WKT

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::data_type::DataType;
use crate::types::{Geometry, Value};

pub struct GeomFromTextFunction;

impl Function for GeomFromTextFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "GEOMFROMTEXT",
            is_aggregate: false,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        // GEOMFROMTEXT(wkt) or GEOMFROMTEXT(wkt, srid)
        if arg_types.is_empty() || arg_types.len() > 2 {
            return Err(Error::Execution(format!(
                "GEOMFROMTEXT takes 1 or 2 arguments, got {}",
                arg_types.len()
            )));
        }
        if !arg_types[0].base_type().is_string() {
            return Err(Error::TypeMismatch {
                expected: "string type".into(),
                found: arg_types[0].to_string(),
            });
        }
        if let Some(srid) = arg_types.get(1)
            && !srid.base_type().is_integer()
        {
            return Err(Error::TypeMismatch {
                expected: "integer".into(),
                found: srid.to_string(),
            });
        }
        Ok(DataType::Geometry)
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        if args.iter().any(|v| v.is_null()) {
            return Ok(Value::Null);
        }
        let Value::Str(wkt) = &args[0] else {
            return Err(Error::TypeMismatch {
                expected: "string value".into(),
                found: args[0].data_type().to_string(),
            });
        };
        let geometry = match args.get(1) {
            Some(srid) => Geometry::with_srid(wkt.clone(), srid.to_i64()? as i32),
            None => Geometry::new(wkt.clone()),
        };
        if geometry.geometry_type().is_empty() {
            return Err(Error::InvalidValue(format!("invalid WKT '{}'", wkt)));
        }
        Ok(Value::Geometry(geometry))
    }
}

/// Register the GEOMFROMTEXT function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(GeomFromTextFunction));
}

//! Custom function registrar tests

mod common;

use common::{string_column, TestContext};
use sievesql::{
    DataType, Error, Function, FunctionRegistrar, FunctionSignature, Geometry, Value,
    PRIMARY_TABLE,
};

/// A domain-specific geometry predicate the engine knows nothing about.
struct GeometryTypeFunction;

impl Function for GeometryTypeFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "ST_GEOMETRYTYPE",
            is_aggregate: false,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> sievesql::Result<DataType> {
        match arg_types {
            [t] if t.base_type() == &DataType::Geometry => Ok(DataType::Str),
            _ => Err(Error::TypeMismatch {
                expected: "GEOMETRY".into(),
                found: format!("{:?}", arg_types),
            }),
        }
    }

    fn execute(&self, args: &[Value]) -> sievesql::Result<Value> {
        match args {
            [Value::Null] => Ok(Value::Null),
            [Value::Geometry(geometry)] => Ok(Value::Str(geometry.geometry_type())),
            _ => Err(Error::Execution("ST_GEOMETRYTYPE expects a geometry".into())),
        }
    }
}

/// A custom aggregate: the median of the accumulated values.
struct MedianFunction;

impl Function for MedianFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "MEDIAN",
            is_aggregate: true,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> sievesql::Result<DataType> {
        match arg_types {
            [t] if t.is_numeric() => Ok(DataType::F64),
            _ => Err(Error::TypeMismatch {
                expected: "numeric type".into(),
                found: format!("{:?}", arg_types),
            }),
        }
    }

    fn execute(&self, args: &[Value]) -> sievesql::Result<Value> {
        if args.is_empty() {
            return Ok(Value::Null);
        }
        let mut values = args
            .iter()
            .map(|v| v.to_f64())
            .collect::<sievesql::Result<Vec<_>>>()?;
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        Ok(Value::F64(values[values.len() / 2]))
    }
}

struct TestRegistrar {
    geometry_type: GeometryTypeFunction,
    median: MedianFunction,
}

impl TestRegistrar {
    fn new() -> Self {
        TestRegistrar {
            geometry_type: GeometryTypeFunction,
            median: MedianFunction,
        }
    }
}

impl FunctionRegistrar for TestRegistrar {
    fn lookup(&self, name: &str) -> Option<&dyn Function> {
        match name.to_uppercase().as_str() {
            "ST_GEOMETRYTYPE" => Some(&self.geometry_type),
            "MEDIAN" => Some(&self.median),
            _ => None,
        }
    }
}

fn parcels() -> TestContext {
    let mut catalog = sievesql::FieldCatalog::new(sievesql::TableDef::new("memory", "parcels"));
    catalog.add_field(PRIMARY_TABLE, "name", DataType::Str);
    catalog.add_field(PRIMARY_TABLE, "population", DataType::F64);
    catalog.add_field(PRIMARY_TABLE, "shape", DataType::Geometry);
    let mut ctx = TestContext::new(catalog);
    ctx.insert(vec![
        Value::string("depot"),
        Value::F64(10.0),
        Value::Geometry(Geometry::new("POINT (1 2)")),
    ]);
    ctx.insert(vec![
        Value::string("park"),
        Value::F64(20.0),
        Value::Geometry(Geometry::new("POLYGON ((0 0, 1 0, 1 1, 0 0))")),
    ]);
    ctx.insert(vec![
        Value::string("plaza"),
        Value::F64(30.0),
        Value::Geometry(Geometry::new("POINT (5 6)")),
    ]);
    ctx
}

#[test]
fn test_custom_function_requires_option() {
    let ctx = parcels();
    let registrar = TestRegistrar::new();
    // Option off: the registrar is never consulted.
    assert_eq!(
        ctx.filter_with("ST_GEOMETRYTYPE(shape) = 'POINT'", Some(&registrar))
            .err(),
        Some(Error::UnknownOperator("ST_GEOMETRYTYPE".into()))
    );
}

#[test]
fn test_custom_function_unknown_name() {
    let mut ctx = parcels();
    ctx.options.allow_custom_functions = true;
    let registrar = TestRegistrar::new();
    assert_eq!(
        ctx.filter_with("ST_BUFFER(shape) = 'POINT'", Some(&registrar))
            .err(),
        Some(Error::UnsupportedCustomFunction("ST_BUFFER".into()))
    );
}

#[test]
fn test_custom_geometry_predicate() {
    let mut ctx = parcels();
    ctx.options.allow_custom_functions = true;
    let registrar = TestRegistrar::new();
    let matched = ctx
        .filter_with("ST_GEOMETRYTYPE(shape) = 'POINT'", Some(&registrar))
        .unwrap();
    assert_eq!(matched.len(), 2);
}

#[test]
fn test_custom_function_type_checked() {
    let mut ctx = parcels();
    ctx.options.allow_custom_functions = true;
    let registrar = TestRegistrar::new();
    // Wrong operand type fails compilation, same as builtins.
    assert!(matches!(
        ctx.filter_with("ST_GEOMETRYTYPE(name) = 'POINT'", Some(&registrar)),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn test_custom_aggregate() {
    let mut ctx = parcels();
    ctx.options.allow_custom_functions = true;
    let registrar = TestRegistrar::new();
    let rows = ctx
        .query_with("SELECT MEDIAN(population) FROM parcels", Some(&registrar))
        .unwrap();
    assert_eq!(rows, vec![vec![Value::F64(20.0)]]);
}

#[test]
fn test_custom_function_in_select_list() {
    let mut ctx = parcels();
    ctx.options.allow_custom_functions = true;
    let registrar = TestRegistrar::new();
    let rows = ctx
        .query_with(
            "SELECT name FROM parcels WHERE ST_GEOMETRYTYPE(shape) = 'POLYGON'",
            Some(&registrar),
        )
        .unwrap();
    assert_eq!(string_column(&rows), vec!["park"]);
}

#[test]
fn test_builtins_shadow_registrar() {
    // A registrar cannot override a builtin name: builtins win.
    struct ShadowCount;
    impl Function for ShadowCount {
        fn signature(&self) -> &FunctionSignature {
            static SIGNATURE: FunctionSignature = FunctionSignature {
                name: "COUNT",
                is_aggregate: false,
            };
            &SIGNATURE
        }
        fn validate(&self, _: &[DataType]) -> sievesql::Result<DataType> {
            Ok(DataType::Str)
        }
        fn execute(&self, _: &[Value]) -> sievesql::Result<Value> {
            Ok(Value::string("shadowed"))
        }
    }
    struct ShadowRegistrar(ShadowCount);
    impl FunctionRegistrar for ShadowRegistrar {
        fn lookup(&self, name: &str) -> Option<&dyn Function> {
            (name.to_uppercase() == "COUNT").then_some(&self.0 as &dyn Function)
        }
    }

    let mut ctx = parcels();
    ctx.options.allow_custom_functions = true;
    let registrar = ShadowRegistrar(ShadowCount);
    let rows = ctx
        .query_with("SELECT COUNT(*) FROM parcels", Some(&registrar))
        .unwrap();
    assert_eq!(rows, vec![vec![Value::I64(3)]]);
}

//! An embeddable SQL-subset engine for arbitrary record sources
//!
//! sievesql compiles WHERE-style filter expressions and SELECT statements
//! against a caller-supplied field catalog, then evaluates the compiled
//! trees against the caller's records through a fetch callback. It is not
//! a database: there is no storage, no planner and no transactions. The
//! record source stays on the caller's side of the fence and only column
//! values cross it.
//!
//! ```
//! use sievesql::{Compiler, FieldCatalog, TableDef, DataType, Value, PRIMARY_TABLE};
//!
//! let mut catalog = FieldCatalog::new(TableDef::new("memory", "cities"));
//! catalog.add_field(PRIMARY_TABLE, "name", DataType::Str);
//! catalog.add_field(PRIMARY_TABLE, "population", DataType::F64);
//!
//! let compiler = Compiler::new(&catalog);
//! let filter = compiler.compile_filter("population > 1000 AND name LIKE 'San%'").unwrap();
//!
//! let record = vec![Value::string("San Jose"), Value::F64(1.2e6)];
//! let result = sievesql::evaluate(&filter.expr, &record, &mut |column, record: &Vec<Value>| {
//!     Ok(record[column.field].clone())
//! }).unwrap();
//! assert_eq!(result, Value::Bool(true));
//! ```

pub mod engine;
pub mod error;
pub mod execution;
pub mod functions;
pub mod operators;
pub mod parsing;
pub mod semantic;
pub mod types;

pub use engine::{CachingCompiler, Compiler};
pub use error::{Error, Result};
pub use execution::{evaluate, evaluate_with_registrar, execute_select, is_match};
pub use functions::{Function, FunctionRegistrar, FunctionSignature};
pub use semantic::{
    AggregateKind, ColumnDef, CompileOptions, CompiledFilter, JoinDef, OrderKey, QueryMode,
    SelectStatement, UnparseOptions,
};
pub use types::{
    ColumnRef, DataType, Expression, FieldCatalog, FieldDef, Geometry, Row, TableDef, Value,
    PRIMARY_TABLE,
};

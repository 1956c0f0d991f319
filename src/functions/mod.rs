//! Function definitions and the function registry
//!
//! Functions follow a trait-based architecture separating signature and
//! validation from execution. Builtins are registered once into a
//! read-only registry; callers can supply additional functions (e.g.
//! domain-specific geometry predicates) through the `FunctionRegistrar`
//! capability, which is consulted only when a name is not found in the
//! built-in table and the compile options allow custom functions.

use crate::error::{Error, Result};
use crate::types::data_type::DataType;
use crate::types::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

// String functions
mod concat;
mod length;
mod lower;
mod substr;
mod upper;

// Aggregate functions
mod avg;
mod count;
mod max;
mod min;
mod sum;

// Type functions
mod coalesce;

// Geometry functions
mod geom_from_text;

/// Metadata about a function's signature
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Whether this is an aggregate function
    pub is_aggregate: bool,
}

/// Trait for scalar and aggregate functions
pub trait Function: Send + Sync {
    /// Get the function's signature
    fn signature(&self) -> &FunctionSignature;

    /// Validate argument types and return the result type
    fn validate(&self, arg_types: &[DataType]) -> Result<DataType>;

    /// Execute the function with runtime values. Aggregate functions are
    /// driven by the aggregation engine instead and refuse scalar
    /// execution.
    fn execute(&self, args: &[Value]) -> Result<Value>;
}

/// Capability for caller-injected functions, looked up by name.
pub trait FunctionRegistrar: Send + Sync {
    fn lookup(&self, name: &str) -> Option<&dyn Function>;
}

/// Registry of the built-in functions
pub struct FunctionRegistry {
    functions: HashMap<String, Box<dyn Function>>,
}

impl FunctionRegistry {
    fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        // Register string functions
        concat::register(&mut registry);
        length::register(&mut registry);
        lower::register(&mut registry);
        substr::register(&mut registry);
        upper::register(&mut registry);

        // Register aggregate functions
        avg::register(&mut registry);
        count::register(&mut registry);
        max::register(&mut registry);
        min::register(&mut registry);
        sum::register(&mut registry);

        // Register type functions
        coalesce::register(&mut registry);

        // Register geometry functions
        geom_from_text::register(&mut registry);

        registry
    }

    fn register(&mut self, function: Box<dyn Function>) {
        let name = function.signature().name.to_string();
        self.functions.insert(name, function);
    }
}

// Global static registry, built once and read-only afterwards
static REGISTRY: LazyLock<FunctionRegistry> = LazyLock::new(FunctionRegistry::new);

/// Look up a built-in function by name (case-insensitive)
pub fn get_function(name: &str) -> Option<&'static dyn Function> {
    REGISTRY
        .functions
        .get(&name.to_uppercase())
        .map(|f| f.as_ref())
}

/// Resolve a function name against the builtins and, failing that, the
/// caller's registrar (when permitted).
pub fn resolve_function<'a>(
    name: &str,
    registrar: Option<&'a dyn FunctionRegistrar>,
    allow_custom: bool,
) -> Result<&'a dyn Function> {
    if let Some(function) = get_function(name) {
        return Ok(function);
    }
    if allow_custom {
        if let Some(function) = registrar.and_then(|r| r.lookup(name)) {
            return Ok(function);
        }
        return Err(Error::UnsupportedCustomFunction(name.to_string()));
    }
    Err(Error::UnknownOperator(name.to_string()))
}

/// Check if a name denotes a built-in aggregate function
pub fn is_aggregate(name: &str) -> bool {
    get_function(name)
        .map(|f| f.signature().is_aggregate)
        .unwrap_or(false)
}

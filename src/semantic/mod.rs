//! Semantic analysis: normalization, resolution, type checking, select
//! analysis and unparsing
//!
//! Compilation pipeline for a bare filter expression:
//! parse -> normalize (BETWEEN rewrite) -> resolve -> type check.
//! A SELECT statement goes through the same pipeline per clause, driven
//! by the select analyzer.

pub mod normalize;
pub mod resolver;
pub mod select;
pub mod typing;
pub mod unparse;

pub use select::{
    AggregateKind, ColumnDef, JoinDef, OrderKey, QueryMode, SelectStatement,
};
pub use unparse::{unparse, UnparseOptions};

use crate::error::Result;
use crate::functions::FunctionRegistrar;
use crate::parsing;
use crate::types::expression::Expression;
use crate::types::{DataType, FieldCatalog};
use serde::{Deserialize, Serialize};

/// Options controlling compilation. All default to off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Let WHERE clauses reference fields of secondary (joined) tables
    pub allow_fields_in_secondary_tables: bool,
    /// Append geometry fields of joined tables to wildcard expansions
    pub auto_add_secondary_geometry_fields: bool,
    /// Prefix every column with its table name in output and unparse
    pub always_prefix_column_with_table_name: bool,
    /// Permit SELECT DISTINCT on a geometry field
    pub allow_distinct_on_geometry_field: bool,
    /// Permit SELECT DISTINCT on more than one field
    pub allow_distinct_on_multiple_fields: bool,
    /// Tolerate comparisons between a string operand and a numeric one;
    /// the string side is parsed at evaluation time
    pub allow_mismatch_type_on_field_comparison: bool,
    /// Consult the caller's function registrar for unknown function names
    pub allow_custom_functions: bool,
}

impl CompileOptions {
    /// Unparse options matching these compile options.
    pub fn unparse_options(&self) -> UnparseOptions {
        UnparseOptions {
            quote_char: '"',
            always_prefix_column_with_table_name: self.always_prefix_column_with_table_name,
        }
    }
}

/// A compiled, type-checked filter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledFilter {
    /// The checked tree
    pub expr: Expression,
    /// The checked result type of the root
    pub data_type: DataType,
}

/// Compiles a WHERE-style expression string against a catalog.
pub fn compile_filter(
    text: &str,
    catalog: &FieldCatalog,
    options: &CompileOptions,
    registrar: Option<&dyn FunctionRegistrar>,
) -> Result<CompiledFilter> {
    let mut ast = parsing::parse_expression(text)?;
    normalize::replace_between_by_ge_and_le(&mut ast);
    let resolver = resolver::Resolver::new(catalog, options, registrar);
    let expr = resolver.resolve(&ast, options.allow_fields_in_secondary_tables)?;
    let data_type = typing::TypeChecker::new(catalog, options, registrar).check(&expr)?;
    Ok(CompiledFilter { expr, data_type })
}

/// Compiles a full SELECT statement string against a catalog.
pub fn compile_select(
    text: &str,
    catalog: &FieldCatalog,
    options: &CompileOptions,
    registrar: Option<&dyn FunctionRegistrar>,
) -> Result<SelectStatement> {
    let raw = parsing::parse_select(text)?;
    select::analyze(&raw, catalog, options, registrar)
}

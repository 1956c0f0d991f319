//! Column and function resolution
//!
//! Turns the parser's name-based AST into the resolved expression tree:
//! column names become catalog indices, literals become runtime values,
//! and function names are checked against the registry (and the caller's
//! registrar, when custom functions are allowed).

use super::CompileOptions;
use crate::error::{Error, Result};
use crate::functions::{self, FunctionRegistrar};
use crate::parsing::ast;
use crate::types::expression::{ColumnRef, Expression};
use crate::types::{FieldCatalog, Value};

/// Resolves AST expressions against a field catalog.
pub struct Resolver<'a> {
    catalog: &'a FieldCatalog,
    options: &'a CompileOptions,
    registrar: Option<&'a dyn FunctionRegistrar>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        catalog: &'a FieldCatalog,
        options: &'a CompileOptions,
        registrar: Option<&'a dyn FunctionRegistrar>,
    ) -> Self {
        Resolver {
            catalog,
            options,
            registrar,
        }
    }

    /// Resolves an expression. `allow_secondary` controls whether fields
    /// of secondary (joined) tables are visible; for WHERE clauses this is
    /// gated by the corresponding compile option.
    pub fn resolve(&self, expr: &ast::Expression, allow_secondary: bool) -> Result<Expression> {
        use ast::Operator::*;

        Ok(match expr {
            ast::Expression::All => {
                return Err(Error::Execution(
                    "* is only valid in a SELECT list or COUNT(*)".into(),
                ));
            }

            ast::Expression::Column(table, name) => {
                let field =
                    self.catalog
                        .resolve_column(table.as_deref(), name, allow_secondary)?;
                let table = self.catalog.fields()[field].table;
                Expression::Column(ColumnRef { table, field })
            }

            ast::Expression::Literal(literal) => Expression::Constant(literal_value(literal)),

            ast::Expression::Function(name, args) => {
                // Resolve the name now so unknown functions fail during
                // compilation, not evaluation.
                let function = functions::resolve_function(
                    name,
                    self.registrar,
                    self.options.allow_custom_functions,
                )?;
                let args = args
                    .iter()
                    .map(|arg| self.resolve(arg, allow_secondary))
                    .collect::<Result<Vec<_>>>()?;
                Expression::Function(function.signature().name.to_string(), args)
            }

            ast::Expression::Cast(expr, to) => Expression::Cast {
                expr: Box::new(self.resolve(expr, allow_secondary)?),
                to: to.clone(),
            },

            ast::Expression::Operator(op) => {
                let resolve_pair = |lhs: &ast::Expression, rhs: &ast::Expression| {
                    Ok::<_, Error>((
                        Box::new(self.resolve(lhs, allow_secondary)?),
                        Box::new(self.resolve(rhs, allow_secondary)?),
                    ))
                };
                match op {
                    And(lhs, rhs) => {
                        let (lhs, rhs) = resolve_pair(lhs, rhs)?;
                        Expression::And(lhs, rhs)
                    }
                    Or(lhs, rhs) => {
                        let (lhs, rhs) = resolve_pair(lhs, rhs)?;
                        Expression::Or(lhs, rhs)
                    }
                    Not(expr) => {
                        Expression::Not(Box::new(self.resolve(expr, allow_secondary)?))
                    }
                    Equal(lhs, rhs) => {
                        let (lhs, rhs) = resolve_pair(lhs, rhs)?;
                        Expression::Equal(lhs, rhs)
                    }
                    NotEqual(lhs, rhs) => {
                        let (lhs, rhs) = resolve_pair(lhs, rhs)?;
                        Expression::NotEqual(lhs, rhs)
                    }
                    LessThan(lhs, rhs) => {
                        let (lhs, rhs) = resolve_pair(lhs, rhs)?;
                        Expression::LessThan(lhs, rhs)
                    }
                    LessThanOrEqual(lhs, rhs) => {
                        let (lhs, rhs) = resolve_pair(lhs, rhs)?;
                        Expression::LessThanOrEqual(lhs, rhs)
                    }
                    GreaterThan(lhs, rhs) => {
                        let (lhs, rhs) = resolve_pair(lhs, rhs)?;
                        Expression::GreaterThan(lhs, rhs)
                    }
                    GreaterThanOrEqual(lhs, rhs) => {
                        let (lhs, rhs) = resolve_pair(lhs, rhs)?;
                        Expression::GreaterThanOrEqual(lhs, rhs)
                    }
                    Add(lhs, rhs) => {
                        let (lhs, rhs) = resolve_pair(lhs, rhs)?;
                        Expression::Add(lhs, rhs)
                    }
                    Subtract(lhs, rhs) => {
                        let (lhs, rhs) = resolve_pair(lhs, rhs)?;
                        Expression::Subtract(lhs, rhs)
                    }
                    Multiply(lhs, rhs) => {
                        let (lhs, rhs) = resolve_pair(lhs, rhs)?;
                        Expression::Multiply(lhs, rhs)
                    }
                    Divide(lhs, rhs) => {
                        let (lhs, rhs) = resolve_pair(lhs, rhs)?;
                        Expression::Divide(lhs, rhs)
                    }
                    Remainder(lhs, rhs) => {
                        let (lhs, rhs) = resolve_pair(lhs, rhs)?;
                        Expression::Remainder(lhs, rhs)
                    }
                    Negate(expr) => {
                        Expression::Negate(Box::new(self.resolve(expr, allow_secondary)?))
                    }
                    Identity(expr) => {
                        Expression::Identity(Box::new(self.resolve(expr, allow_secondary)?))
                    }
                    IsNull(expr, negated) => Expression::IsNull(
                        Box::new(self.resolve(expr, allow_secondary)?),
                        *negated,
                    ),
                    Like(lhs, rhs, negated) => {
                        let (lhs, rhs) = resolve_pair(lhs, rhs)?;
                        Expression::Like(lhs, rhs, *negated)
                    }
                    ILike(lhs, rhs, negated) => {
                        let (lhs, rhs) = resolve_pair(lhs, rhs)?;
                        Expression::ILike(lhs, rhs, *negated)
                    }
                    InList {
                        expr,
                        list,
                        negated,
                    } => Expression::InList {
                        expr: Box::new(self.resolve(expr, allow_secondary)?),
                        list: list
                            .iter()
                            .map(|item| self.resolve(item, allow_secondary))
                            .collect::<Result<Vec<_>>>()?,
                        negated: *negated,
                    },
                    // Normalization replaces BETWEEN before resolution.
                    Between { .. } => {
                        return Err(Error::Execution(
                            "BETWEEN must be normalized before resolution".into(),
                        ));
                    }
                }
            }
        })
    }
}

/// Converts an AST literal to a runtime value.
pub fn literal_value(literal: &ast::Literal) -> Value {
    match literal {
        ast::Literal::Null => Value::Null,
        ast::Literal::Boolean(b) => Value::Bool(*b),
        ast::Literal::Integer(i) => Value::I32(*i),
        ast::Literal::BigInt(i) => Value::I64(*i),
        ast::Literal::Float(f) => Value::F64(*f),
        ast::Literal::String(s) => Value::Str(s.clone()),
        ast::Literal::Date(d) => Value::Date(*d),
        ast::Literal::Time(t) => Value::Time(*t),
        ast::Literal::Timestamp(ts) => Value::Timestamp(*ts),
    }
}

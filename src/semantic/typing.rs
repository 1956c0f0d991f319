//! Bottom-up type inference and checking
//!
//! Walks the resolved tree, computing every node's result type and
//! dispatching each operation to its registry checker. Recursion depth is
//! bounded so a hostile expression fails with a structured error instead
//! of overflowing the stack.

use super::CompileOptions;
use crate::error::{Error, Result};
use crate::functions::{self, FunctionRegistrar};
use crate::operators;
use crate::parsing::MAX_EXPRESSION_DEPTH;
use crate::types::coercion::cast_supported;
use crate::types::expression::Expression;
use crate::types::{DataType, FieldCatalog};

/// Type checker for resolved expressions.
pub struct TypeChecker<'a> {
    catalog: &'a FieldCatalog,
    options: &'a CompileOptions,
    registrar: Option<&'a dyn FunctionRegistrar>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(
        catalog: &'a FieldCatalog,
        options: &'a CompileOptions,
        registrar: Option<&'a dyn FunctionRegistrar>,
    ) -> Self {
        TypeChecker {
            catalog,
            options,
            registrar,
        }
    }

    /// Infers and validates the type of an expression.
    pub fn check(&self, expr: &Expression) -> Result<DataType> {
        self.check_at(expr, 0)
    }

    fn check_at(&self, expr: &Expression, depth: usize) -> Result<DataType> {
        use Expression::*;

        if depth >= MAX_EXPRESSION_DEPTH {
            return Err(Error::RecursionLimitExceeded(MAX_EXPRESSION_DEPTH));
        }
        let depth = depth + 1;

        Ok(match expr {
            Constant(value) => value.data_type(),

            Column(column) => {
                let field = self
                    .catalog
                    .field(column.field)
                    .ok_or_else(|| Error::UnknownColumn(format!("#{}", column.field)))?;
                field.data_type.clone()
            }

            And(lhs, rhs) => {
                let (l, r) = (self.check_at(lhs, depth)?, self.check_at(rhs, depth)?);
                operators::validate_and(&l, &r)?
            }
            Or(lhs, rhs) => {
                let (l, r) = (self.check_at(lhs, depth)?, self.check_at(rhs, depth)?);
                operators::validate_or(&l, &r)?
            }
            Not(expr) => operators::validate_not(&self.check_at(expr, depth)?)?,

            Equal(lhs, rhs) => self.check_comparison(lhs, rhs, operators::validate_equal, depth)?,
            NotEqual(lhs, rhs) => {
                self.check_comparison(lhs, rhs, operators::validate_not_equal, depth)?
            }
            LessThan(lhs, rhs) => {
                self.check_comparison(lhs, rhs, operators::validate_less_than, depth)?
            }
            LessThanOrEqual(lhs, rhs) => {
                self.check_comparison(lhs, rhs, operators::validate_less_than_equal, depth)?
            }
            GreaterThan(lhs, rhs) => {
                self.check_comparison(lhs, rhs, operators::validate_greater_than, depth)?
            }
            GreaterThanOrEqual(lhs, rhs) => {
                self.check_comparison(lhs, rhs, operators::validate_greater_than_equal, depth)?
            }

            Add(lhs, rhs) => {
                let (l, r) = (self.check_at(lhs, depth)?, self.check_at(rhs, depth)?);
                operators::validate_add(&l, &r)?
            }
            Subtract(lhs, rhs) => {
                let (l, r) = (self.check_at(lhs, depth)?, self.check_at(rhs, depth)?);
                operators::validate_subtract(&l, &r)?
            }
            Multiply(lhs, rhs) => {
                let (l, r) = (self.check_at(lhs, depth)?, self.check_at(rhs, depth)?);
                operators::validate_multiply(&l, &r)?
            }
            Divide(lhs, rhs) => {
                let (l, r) = (self.check_at(lhs, depth)?, self.check_at(rhs, depth)?);
                operators::validate_divide(&l, &r)?
            }
            Remainder(lhs, rhs) => {
                let (l, r) = (self.check_at(lhs, depth)?, self.check_at(rhs, depth)?);
                operators::validate_remainder(&l, &r)?
            }
            Negate(expr) => operators::validate_negate(&self.check_at(expr, depth)?)?,
            Identity(expr) => operators::validate_identity(&self.check_at(expr, depth)?)?,

            Like(lhs, rhs, _) => {
                let (l, r) = (self.check_at(lhs, depth)?, self.check_at(rhs, depth)?);
                operators::validate_like(&l, &r)?
            }
            ILike(lhs, rhs, _) => {
                let (l, r) = (self.check_at(lhs, depth)?, self.check_at(rhs, depth)?);
                operators::validate_ilike(&l, &r)?
            }

            IsNull(expr, _) => {
                self.check_at(expr, depth)?;
                DataType::Bool
            }

            InList { expr, list, .. } => {
                // Every list element must be comparable with the tested
                // expression, under the same tolerance rules as equality.
                let tested = self.check_at(expr, depth)?;
                for item in list {
                    let item_type = self.check_at(item, depth)?;
                    self.comparison_result(&tested, &item_type, operators::validate_equal)?;
                }
                DataType::Nullable(Box::new(DataType::Bool))
            }

            Function(name, args) => {
                let function = functions::resolve_function(
                    name,
                    self.registrar,
                    self.options.allow_custom_functions,
                )?;
                if function.signature().is_aggregate {
                    return Err(Error::Execution(format!(
                        "aggregate function {} is not allowed here",
                        function.signature().name
                    )));
                }
                let arg_types = args
                    .iter()
                    .map(|arg| self.check_at(arg, depth))
                    .collect::<Result<Vec<_>>>()?;
                function.validate(&arg_types)?
            }

            Cast { expr, to } => {
                let from = self.check_at(expr, depth)?;
                if !cast_supported(&from, to) {
                    return Err(Error::UnsupportedCast {
                        from: from.to_string(),
                        to: to.to_string(),
                    });
                }
                to.clone()
            }
        })
    }

    fn check_comparison(
        &self,
        lhs: &Expression,
        rhs: &Expression,
        validate: fn(&DataType, &DataType) -> Result<DataType>,
        depth: usize,
    ) -> Result<DataType> {
        let (l, r) = (self.check_at(lhs, depth)?, self.check_at(rhs, depth)?);
        self.comparison_result(&l, &r, validate)
    }

    /// Applies a comparison checker, downgrading a string/numeric mismatch
    /// to a tolerated (nullable) comparison when the option is set.
    fn comparison_result(
        &self,
        l: &DataType,
        r: &DataType,
        validate: fn(&DataType, &DataType) -> Result<DataType>,
    ) -> Result<DataType> {
        match validate(l, r) {
            Ok(result) => Ok(result),
            Err(Error::TypeMismatch { .. })
                if self.options.allow_mismatch_type_on_field_comparison
                    && string_numeric_types(l, r) =>
            {
                // The string side is parsed at evaluation; an unparseable
                // value compares as unknown, hence nullable.
                Ok(DataType::Nullable(Box::new(DataType::Bool)))
            }
            Err(err) => Err(err),
        }
    }
}

/// Whether one side is string-typed and the other numeric.
fn string_numeric_types(l: &DataType, r: &DataType) -> bool {
    (l.base_type().is_string() && r.base_type().is_numeric())
        || (r.base_type().is_string() && l.base_type().is_numeric())
}

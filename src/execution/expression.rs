//! Expression evaluation against one record
//!
//! Walks a compiled tree, pulling column values through a caller-supplied
//! fetch callback. The record handle is an opaque generic: the engine
//! never looks inside it, it only hands it back to the callback.

use crate::error::{Error, Result};
use crate::functions::{self, FunctionRegistrar};
use crate::operators;
use crate::operators::helpers::compare_values;
use crate::types::coercion::coerce_value;
use crate::types::expression::{ColumnRef, Expression};
use crate::types::Value;
use std::cmp::Ordering;

/// Evaluate an expression against one record. Column values are fetched
/// through the callback; a failing fetch is confined to this record and
/// yields NULL rather than aborting evaluation.
pub fn evaluate<R, F>(expr: &Expression, record: &R, fetch: &mut F) -> Result<Value>
where
    F: FnMut(&ColumnRef, &R) -> Result<Value>,
{
    evaluate_with_registrar(expr, record, fetch, None)
}

/// Evaluate with a registrar for custom function dispatch.
pub fn evaluate_with_registrar<R, F>(
    expr: &Expression,
    record: &R,
    fetch: &mut F,
    registrar: Option<&dyn FunctionRegistrar>,
) -> Result<Value>
where
    F: FnMut(&ColumnRef, &R) -> Result<Value>,
{
    use Expression::*;

    Ok(match expr {
        Constant(value) => value.clone(),

        Column(column) => fetch(column, record).unwrap_or(Value::Null),

        // AND short-circuits on a definitive false: the right child is
        // not evaluated (and its fetches never happen).
        And(lhs, rhs) => {
            let l = evaluate_with_registrar(lhs, record, fetch, registrar)?;
            if l == Value::Bool(false) {
                return Ok(Value::Bool(false));
            }
            let r = evaluate_with_registrar(rhs, record, fetch, registrar)?;
            operators::execute_and(&l, &r)?
        }

        // OR short-circuits symmetrically on a definitive true.
        Or(lhs, rhs) => {
            let l = evaluate_with_registrar(lhs, record, fetch, registrar)?;
            if l == Value::Bool(true) {
                return Ok(Value::Bool(true));
            }
            let r = evaluate_with_registrar(rhs, record, fetch, registrar)?;
            operators::execute_or(&l, &r)?
        }

        Not(expr) => {
            operators::execute_not(&evaluate_with_registrar(expr, record, fetch, registrar)?)?
        }

        Equal(lhs, rhs) => {
            let l = evaluate_with_registrar(lhs, record, fetch, registrar)?;
            let r = evaluate_with_registrar(rhs, record, fetch, registrar)?;
            operators::execute_equal(&l, &r)?
        }
        NotEqual(lhs, rhs) => {
            let l = evaluate_with_registrar(lhs, record, fetch, registrar)?;
            let r = evaluate_with_registrar(rhs, record, fetch, registrar)?;
            operators::execute_not_equal(&l, &r)?
        }
        LessThan(lhs, rhs) => {
            let l = evaluate_with_registrar(lhs, record, fetch, registrar)?;
            let r = evaluate_with_registrar(rhs, record, fetch, registrar)?;
            operators::execute_less_than(&l, &r)?
        }
        LessThanOrEqual(lhs, rhs) => {
            let l = evaluate_with_registrar(lhs, record, fetch, registrar)?;
            let r = evaluate_with_registrar(rhs, record, fetch, registrar)?;
            operators::execute_less_than_equal(&l, &r)?
        }
        GreaterThan(lhs, rhs) => {
            let l = evaluate_with_registrar(lhs, record, fetch, registrar)?;
            let r = evaluate_with_registrar(rhs, record, fetch, registrar)?;
            operators::execute_greater_than(&l, &r)?
        }
        GreaterThanOrEqual(lhs, rhs) => {
            let l = evaluate_with_registrar(lhs, record, fetch, registrar)?;
            let r = evaluate_with_registrar(rhs, record, fetch, registrar)?;
            operators::execute_greater_than_equal(&l, &r)?
        }

        Add(lhs, rhs) => {
            let l = evaluate_with_registrar(lhs, record, fetch, registrar)?;
            let r = evaluate_with_registrar(rhs, record, fetch, registrar)?;
            operators::execute_add(&l, &r)?
        }
        Subtract(lhs, rhs) => {
            let l = evaluate_with_registrar(lhs, record, fetch, registrar)?;
            let r = evaluate_with_registrar(rhs, record, fetch, registrar)?;
            operators::execute_subtract(&l, &r)?
        }
        Multiply(lhs, rhs) => {
            let l = evaluate_with_registrar(lhs, record, fetch, registrar)?;
            let r = evaluate_with_registrar(rhs, record, fetch, registrar)?;
            operators::execute_multiply(&l, &r)?
        }
        Divide(lhs, rhs) => {
            let l = evaluate_with_registrar(lhs, record, fetch, registrar)?;
            let r = evaluate_with_registrar(rhs, record, fetch, registrar)?;
            operators::execute_divide(&l, &r)?
        }
        Remainder(lhs, rhs) => {
            let l = evaluate_with_registrar(lhs, record, fetch, registrar)?;
            let r = evaluate_with_registrar(rhs, record, fetch, registrar)?;
            operators::execute_remainder(&l, &r)?
        }

        Negate(expr) => {
            operators::execute_negate(&evaluate_with_registrar(expr, record, fetch, registrar)?)?
        }
        Identity(expr) => operators::execute_identity(&evaluate_with_registrar(
            expr, record, fetch, registrar,
        )?)?,

        Like(lhs, rhs, negated) => {
            let l = evaluate_with_registrar(lhs, record, fetch, registrar)?;
            let r = evaluate_with_registrar(rhs, record, fetch, registrar)?;
            let result = operators::execute_like(&l, &r)?;
            if *negated {
                operators::execute_not(&result)?
            } else {
                result
            }
        }
        ILike(lhs, rhs, negated) => {
            let l = evaluate_with_registrar(lhs, record, fetch, registrar)?;
            let r = evaluate_with_registrar(rhs, record, fetch, registrar)?;
            let result = operators::execute_ilike(&l, &r)?;
            if *negated {
                operators::execute_not(&result)?
            } else {
                result
            }
        }

        IsNull(expr, negated) => {
            let value = evaluate_with_registrar(expr, record, fetch, registrar)?;
            Value::Bool(value.is_null() != *negated)
        }

        // Three-valued IN: a NULL candidate or a NULL list member that
        // prevented a match makes the result unknown.
        InList {
            expr,
            list,
            negated,
        } => {
            let value = evaluate_with_registrar(expr, record, fetch, registrar)?;
            if value.is_null() {
                return Ok(Value::Null);
            }

            let mut found = false;
            let mut has_null = false;
            for item in list {
                let item = evaluate_with_registrar(item, record, fetch, registrar)?;
                if item.is_null() {
                    has_null = true;
                } else if compare_values(&value, &item)? == Some(Ordering::Equal) {
                    found = true;
                    break;
                }
            }

            if found {
                Value::Bool(!negated)
            } else if has_null {
                Value::Null
            } else {
                Value::Bool(*negated)
            }
        }

        Function(name, args) => {
            let function = functions::resolve_function(name, registrar, true)
                .map_err(|_| Error::Execution(format!("unknown function: {}", name)))?;
            let values = args
                .iter()
                .map(|arg| evaluate_with_registrar(arg, record, fetch, registrar))
                .collect::<Result<Vec<_>>>()?;
            function.execute(&values)?
        }

        Cast { expr, to } => {
            let value = evaluate_with_registrar(expr, record, fetch, registrar)?;
            coerce_value(&value, to)?
        }
    })
}

/// Whether a WHERE result includes the record: only a definitive TRUE
/// does; FALSE and NULL (unknown) both exclude it.
pub fn is_match(value: &Value) -> bool {
    *value == Value::Bool(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_columns(_: &ColumnRef, _: &()) -> Result<Value> {
        Err(Error::Execution("no columns in this test".into()))
    }

    #[test]
    fn test_constant_evaluation() {
        let expr = Expression::Add(
            Box::new(Expression::Constant(Value::I32(2))),
            Box::new(Expression::Constant(Value::I32(3))),
        );
        assert_eq!(
            evaluate(&expr, &(), &mut no_columns).unwrap(),
            Value::I32(5)
        );
    }

    #[test]
    fn test_failed_fetch_becomes_null() {
        let expr = Expression::Column(ColumnRef { table: 0, field: 0 });
        assert_eq!(evaluate(&expr, &(), &mut no_columns).unwrap(), Value::Null);
    }

    #[test]
    fn test_and_short_circuit_skips_fetch() {
        // FALSE AND column: the fetcher must never run.
        let expr = Expression::And(
            Box::new(Expression::Constant(Value::Bool(false))),
            Box::new(Expression::Column(ColumnRef { table: 0, field: 0 })),
        );
        let mut fetches = 0;
        let mut fetch = |_: &ColumnRef, _: &()| {
            fetches += 1;
            Ok(Value::Bool(true))
        };
        assert_eq!(
            evaluate(&expr, &(), &mut fetch).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(fetches, 0);
    }

    #[test]
    fn test_or_short_circuit_skips_fetch() {
        let expr = Expression::Or(
            Box::new(Expression::Constant(Value::Bool(true))),
            Box::new(Expression::Column(ColumnRef { table: 0, field: 0 })),
        );
        let mut fetches = 0;
        let mut fetch = |_: &ColumnRef, _: &()| {
            fetches += 1;
            Ok(Value::Bool(false))
        };
        assert_eq!(evaluate(&expr, &(), &mut fetch).unwrap(), Value::Bool(true));
        assert_eq!(fetches, 0);
    }

    #[test]
    fn test_null_and_does_not_short_circuit() {
        // NULL AND FALSE is FALSE, so the right side must be evaluated.
        let expr = Expression::And(
            Box::new(Expression::Constant(Value::Null)),
            Box::new(Expression::Constant(Value::Bool(false))),
        );
        assert_eq!(
            evaluate(&expr, &(), &mut no_columns).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_in_list_three_valued() {
        let in_list = |value: Value, list: Vec<Value>, negated: bool| Expression::InList {
            expr: Box::new(Expression::Constant(value)),
            list: list.into_iter().map(Expression::Constant).collect(),
            negated,
        };
        assert_eq!(
            evaluate(
                &in_list(Value::I32(2), vec![Value::I32(1), Value::I32(2)], false),
                &(),
                &mut no_columns
            )
            .unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            evaluate(
                &in_list(Value::I32(3), vec![Value::I32(1), Value::Null], false),
                &(),
                &mut no_columns
            )
            .unwrap(),
            Value::Null
        );
        assert_eq!(
            evaluate(
                &in_list(Value::I32(3), vec![Value::I32(1)], true),
                &(),
                &mut no_columns
            )
            .unwrap(),
            Value::Bool(true)
        );
    }
}

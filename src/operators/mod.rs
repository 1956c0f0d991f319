//! Operator implementations and the operator registry
//!
//! Each operator lives in its own module and pairs a `validate` type
//! checker with an `execute` evaluator, keeping both halves consistent.
//! The registry is built once at startup, is read-only afterwards, and is
//! keyed both by a stable operator code and by the case-insensitive
//! operator symbol.

pub mod helpers;
pub mod traits;

// Arithmetic operators
mod add;
mod divide;
mod multiply;
mod remainder;
mod subtract;

// Comparison operators
mod equal;
mod greater_than;
mod greater_than_equal;
mod less_than;
mod less_than_equal;
mod not_equal;

// Logical operators
mod and;
mod not;
mod or;

// Unary operators
mod identity;
mod negate;

// Pattern matching operators
mod ilike;
mod like;

pub use traits::{BinaryOperator, UnaryOperator};

use crate::error::{Error, Result};
use crate::types::{DataType, Value};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Stable codes identifying every built-in operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCode {
    And,
    Or,
    Not,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Negate,
    Identity,
    Like,
    ILike,
}

/// A registry entry: the operator's evaluator/checker pair behind its
/// arity-specific trait.
pub enum OperatorDef {
    Binary(&'static dyn BinaryOperator),
    Unary(&'static dyn UnaryOperator),
}

impl OperatorDef {
    pub fn symbol(&self) -> &'static str {
        match self {
            OperatorDef::Binary(op) => op.symbol(),
            OperatorDef::Unary(op) => op.symbol(),
        }
    }
}

static AND: and::AndOperator = and::AndOperator;
static OR: or::OrOperator = or::OrOperator;
static NOT: not::NotOperator = not::NotOperator;
static EQUAL: equal::EqualOperator = equal::EqualOperator;
static NOT_EQUAL: not_equal::NotEqualOperator = not_equal::NotEqualOperator;
static LESS_THAN: less_than::LessThanOperator = less_than::LessThanOperator;
static LESS_THAN_EQUAL: less_than_equal::LessThanEqualOperator =
    less_than_equal::LessThanEqualOperator;
static GREATER_THAN: greater_than::GreaterThanOperator = greater_than::GreaterThanOperator;
static GREATER_THAN_EQUAL: greater_than_equal::GreaterThanEqualOperator =
    greater_than_equal::GreaterThanEqualOperator;
static ADD: add::AddOperator = add::AddOperator;
static SUBTRACT: subtract::SubtractOperator = subtract::SubtractOperator;
static MULTIPLY: multiply::MultiplyOperator = multiply::MultiplyOperator;
static DIVIDE: divide::DivideOperator = divide::DivideOperator;
static REMAINDER: remainder::RemainderOperator = remainder::RemainderOperator;
static NEGATE: negate::NegateOperator = negate::NegateOperator;
static IDENTITY: identity::IdentityOperator = identity::IdentityOperator;
static LIKE: like::LikeOperator = like::LikeOperator;
static ILIKE: ilike::ILikeOperator = ilike::ILikeOperator;

/// The operator table, built once and never mutated afterwards. Safe to
/// share across threads.
static REGISTRY: LazyLock<HashMap<OperatorCode, OperatorDef>> = LazyLock::new(|| {
    use OperatorCode::*;
    let mut registry = HashMap::new();
    registry.insert(And, OperatorDef::Binary(&AND));
    registry.insert(Or, OperatorDef::Binary(&OR));
    registry.insert(Not, OperatorDef::Unary(&NOT));
    registry.insert(Equal, OperatorDef::Binary(&EQUAL));
    registry.insert(NotEqual, OperatorDef::Binary(&NOT_EQUAL));
    registry.insert(LessThan, OperatorDef::Binary(&LESS_THAN));
    registry.insert(LessThanOrEqual, OperatorDef::Binary(&LESS_THAN_EQUAL));
    registry.insert(GreaterThan, OperatorDef::Binary(&GREATER_THAN));
    registry.insert(GreaterThanOrEqual, OperatorDef::Binary(&GREATER_THAN_EQUAL));
    registry.insert(Add, OperatorDef::Binary(&ADD));
    registry.insert(Subtract, OperatorDef::Binary(&SUBTRACT));
    registry.insert(Multiply, OperatorDef::Binary(&MULTIPLY));
    registry.insert(Divide, OperatorDef::Binary(&DIVIDE));
    registry.insert(Remainder, OperatorDef::Binary(&REMAINDER));
    registry.insert(Negate, OperatorDef::Unary(&NEGATE));
    registry.insert(Identity, OperatorDef::Unary(&IDENTITY));
    registry.insert(Like, OperatorDef::Binary(&LIKE));
    registry.insert(ILike, OperatorDef::Binary(&ILIKE));
    registry
});

/// Look up an operator by its stable code.
pub fn lookup(code: OperatorCode) -> &'static OperatorDef {
    &REGISTRY[&code]
}

/// Look up an operator code by its symbol (case-insensitive).
pub fn lookup_by_name(name: &str) -> Result<OperatorCode> {
    REGISTRY
        .iter()
        .find(|(_, def)| def.symbol().eq_ignore_ascii_case(name))
        .map(|(code, _)| *code)
        .ok_or_else(|| Error::UnknownOperator(name.to_string()))
}

/// The display symbol for an operator code.
pub fn symbol(code: OperatorCode) -> &'static str {
    lookup(code).symbol()
}

// Free validate/execute entry points, one pair per operator.

pub fn validate_and(left: &DataType, right: &DataType) -> Result<DataType> {
    AND.validate(left, right)
}

pub fn execute_and(left: &Value, right: &Value) -> Result<Value> {
    AND.execute(left, right)
}

pub fn validate_or(left: &DataType, right: &DataType) -> Result<DataType> {
    OR.validate(left, right)
}

pub fn execute_or(left: &Value, right: &Value) -> Result<Value> {
    OR.execute(left, right)
}

pub fn validate_not(operand: &DataType) -> Result<DataType> {
    NOT.validate(operand)
}

pub fn execute_not(operand: &Value) -> Result<Value> {
    NOT.execute(operand)
}

pub fn validate_equal(left: &DataType, right: &DataType) -> Result<DataType> {
    EQUAL.validate(left, right)
}

pub fn execute_equal(left: &Value, right: &Value) -> Result<Value> {
    EQUAL.execute(left, right)
}

pub fn validate_not_equal(left: &DataType, right: &DataType) -> Result<DataType> {
    NOT_EQUAL.validate(left, right)
}

pub fn execute_not_equal(left: &Value, right: &Value) -> Result<Value> {
    NOT_EQUAL.execute(left, right)
}

pub fn validate_less_than(left: &DataType, right: &DataType) -> Result<DataType> {
    LESS_THAN.validate(left, right)
}

pub fn execute_less_than(left: &Value, right: &Value) -> Result<Value> {
    LESS_THAN.execute(left, right)
}

pub fn validate_less_than_equal(left: &DataType, right: &DataType) -> Result<DataType> {
    LESS_THAN_EQUAL.validate(left, right)
}

pub fn execute_less_than_equal(left: &Value, right: &Value) -> Result<Value> {
    LESS_THAN_EQUAL.execute(left, right)
}

pub fn validate_greater_than(left: &DataType, right: &DataType) -> Result<DataType> {
    GREATER_THAN.validate(left, right)
}

pub fn execute_greater_than(left: &Value, right: &Value) -> Result<Value> {
    GREATER_THAN.execute(left, right)
}

pub fn validate_greater_than_equal(left: &DataType, right: &DataType) -> Result<DataType> {
    GREATER_THAN_EQUAL.validate(left, right)
}

pub fn execute_greater_than_equal(left: &Value, right: &Value) -> Result<Value> {
    GREATER_THAN_EQUAL.execute(left, right)
}

pub fn validate_add(left: &DataType, right: &DataType) -> Result<DataType> {
    ADD.validate(left, right)
}

pub fn execute_add(left: &Value, right: &Value) -> Result<Value> {
    ADD.execute(left, right)
}

pub fn validate_subtract(left: &DataType, right: &DataType) -> Result<DataType> {
    SUBTRACT.validate(left, right)
}

pub fn execute_subtract(left: &Value, right: &Value) -> Result<Value> {
    SUBTRACT.execute(left, right)
}

pub fn validate_multiply(left: &DataType, right: &DataType) -> Result<DataType> {
    MULTIPLY.validate(left, right)
}

pub fn execute_multiply(left: &Value, right: &Value) -> Result<Value> {
    MULTIPLY.execute(left, right)
}

pub fn validate_divide(left: &DataType, right: &DataType) -> Result<DataType> {
    DIVIDE.validate(left, right)
}

pub fn execute_divide(left: &Value, right: &Value) -> Result<Value> {
    DIVIDE.execute(left, right)
}

pub fn validate_remainder(left: &DataType, right: &DataType) -> Result<DataType> {
    REMAINDER.validate(left, right)
}

pub fn execute_remainder(left: &Value, right: &Value) -> Result<Value> {
    REMAINDER.execute(left, right)
}

pub fn validate_negate(operand: &DataType) -> Result<DataType> {
    NEGATE.validate(operand)
}

pub fn execute_negate(operand: &Value) -> Result<Value> {
    NEGATE.execute(operand)
}

pub fn validate_identity(operand: &DataType) -> Result<DataType> {
    IDENTITY.validate(operand)
}

pub fn execute_identity(operand: &Value) -> Result<Value> {
    IDENTITY.execute(operand)
}

pub fn validate_like(left: &DataType, right: &DataType) -> Result<DataType> {
    LIKE.validate(left, right)
}

pub fn execute_like(left: &Value, right: &Value) -> Result<Value> {
    LIKE.execute(left, right)
}

pub fn validate_ilike(left: &DataType, right: &DataType) -> Result<DataType> {
    ILIKE.validate(left, right)
}

pub fn execute_ilike(left: &Value, right: &Value) -> Result<Value> {
    ILIKE.execute(left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        assert_eq!(lookup(OperatorCode::Add).symbol(), "+");
        assert_eq!(lookup(OperatorCode::ILike).symbol(), "ILIKE");
        assert_eq!(lookup_by_name("like").unwrap(), OperatorCode::Like);
        assert_eq!(lookup_by_name("AND").unwrap(), OperatorCode::And);
        assert_eq!(
            lookup_by_name("bogus"),
            Err(Error::UnknownOperator("bogus".into()))
        );
    }
}

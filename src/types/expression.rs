//! The resolved expression tree evaluated against records
//!
//! Produced from the parser's AST by semantic resolution: column names are
//! replaced by catalog indices and literals by runtime values. Children are
//! exclusively owned boxes, so every tree is a strict tree by construction.

use super::data_type::DataType;
use super::value::Value;
use serde::{Deserialize, Serialize};

/// A resolved column reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Index into the catalog's table list of the owning table
    pub table: usize,
    /// Index into the catalog's field list
    pub field: usize,
}

/// A resolved expression, ready for type checking and evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// A constant value.
    Constant(Value),
    /// A column reference, resolved against the field catalog.
    Column(ColumnRef),

    // Logical operators
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),

    // Comparison operators
    Equal(Box<Expression>, Box<Expression>),
    NotEqual(Box<Expression>, Box<Expression>),
    LessThan(Box<Expression>, Box<Expression>),
    LessThanOrEqual(Box<Expression>, Box<Expression>),
    GreaterThan(Box<Expression>, Box<Expression>),
    GreaterThanOrEqual(Box<Expression>, Box<Expression>),

    // Arithmetic operators
    Add(Box<Expression>, Box<Expression>),
    Subtract(Box<Expression>, Box<Expression>),
    Multiply(Box<Expression>, Box<Expression>),
    Divide(Box<Expression>, Box<Expression>),
    Remainder(Box<Expression>, Box<Expression>),
    Negate(Box<Expression>),
    Identity(Box<Expression>),

    // Pattern matching
    Like(Box<Expression>, Box<Expression>, bool),
    ILike(Box<Expression>, Box<Expression>, bool),

    /// IS NULL / IS NOT NULL
    IsNull(Box<Expression>, bool),

    /// a IN (b, c, d), optionally negated
    InList {
        expr: Box<Expression>,
        list: Vec<Expression>,
        negated: bool,
    },

    /// A function call, builtin or registrar-supplied.
    Function(String, Vec<Expression>),

    /// CAST(expr AS type)
    Cast {
        expr: Box<Expression>,
        to: DataType,
    },
}

impl Expression {
    /// Walks the expression tree depth-first, calling a closure for every
    /// node. Halts and returns false if the closure returns false.
    pub fn walk(&self, visitor: &mut impl FnMut(&Expression) -> bool) -> bool {
        use Expression::*;

        if !visitor(self) {
            return false;
        }

        match self {
            And(lhs, rhs)
            | Or(lhs, rhs)
            | Equal(lhs, rhs)
            | NotEqual(lhs, rhs)
            | LessThan(lhs, rhs)
            | LessThanOrEqual(lhs, rhs)
            | GreaterThan(lhs, rhs)
            | GreaterThanOrEqual(lhs, rhs)
            | Add(lhs, rhs)
            | Subtract(lhs, rhs)
            | Multiply(lhs, rhs)
            | Divide(lhs, rhs)
            | Remainder(lhs, rhs)
            | Like(lhs, rhs, _)
            | ILike(lhs, rhs, _) => lhs.walk(visitor) && rhs.walk(visitor),

            Not(expr) | Negate(expr) | Identity(expr) | IsNull(expr, _) => expr.walk(visitor),

            InList { expr, list, .. } => {
                expr.walk(visitor) && list.iter().all(|e| e.walk(visitor))
            }

            Function(_, args) => args.iter().all(|e| e.walk(visitor)),

            Cast { expr, .. } => expr.walk(visitor),

            Constant(_) | Column(_) => true,
        }
    }

    /// Returns whether the expression references any column.
    pub fn is_constant(&self) -> bool {
        self.walk(&mut |expr| !matches!(expr, Expression::Column(_)))
    }

    /// Returns whether the expression references the given table.
    pub fn references_table(&self, table: usize) -> bool {
        !self.walk(&mut |expr| !matches!(expr, Expression::Column(c) if c.table == table))
    }
}

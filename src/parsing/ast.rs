//! Abstract syntax tree produced by the parser
//!
//! The AST only ensures the syntax is well-formed; it does not know whether
//! a referenced table or column exists. Name resolution and type checking
//! are the job of the semantic analyzer.

use crate::types::DataType;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// An unresolved expression, e.g. `a + 7 > b`. Can be nested.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// All columns, i.e. *.
    All,
    /// A column reference, optionally qualified with a table name.
    Column(Option<String>, String),
    /// A literal value.
    Literal(Literal),
    /// A function call (name and arguments).
    Function(String, Vec<Expression>),
    /// An operator.
    Operator(Operator),
    /// CAST(expr AS type)
    Cast(Box<Expression>, DataType),
}

/// Expression literal values.
///
/// Numeric literals are classified by the parser: integers that fit in
/// 32 bits become `Integer`, wider ones `BigInt`, and anything with a
/// decimal point or exponent `Float`. Temporal literals are tagged with
/// their own variants even though source text carries them as strings.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i32),
    BigInt(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
}

/// Expression operators.
///
/// Since this is a recursive data structure, we have to box each child
/// expression, which incurs a heap allocation.
#[derive(Clone, Debug, PartialEq)]
pub enum Operator {
    And(Box<Expression>, Box<Expression>), // a AND b
    Not(Box<Expression>),                  // NOT a
    Or(Box<Expression>, Box<Expression>),  // a OR b

    Equal(Box<Expression>, Box<Expression>),       // a = b
    GreaterThan(Box<Expression>, Box<Expression>), // a > b
    GreaterThanOrEqual(Box<Expression>, Box<Expression>), // a >= b
    IsNull(Box<Expression>, bool),                 // a IS [NOT] NULL
    LessThan(Box<Expression>, Box<Expression>),    // a < b
    LessThanOrEqual(Box<Expression>, Box<Expression>), // a <= b
    NotEqual(Box<Expression>, Box<Expression>),    // a != b

    Add(Box<Expression>, Box<Expression>),      // a + b
    Divide(Box<Expression>, Box<Expression>),   // a / b
    Identity(Box<Expression>),                  // +a
    Multiply(Box<Expression>, Box<Expression>), // a * b
    Negate(Box<Expression>),                    // -a
    Remainder(Box<Expression>, Box<Expression>), // a % b
    Subtract(Box<Expression>, Box<Expression>), // a - b

    Like(Box<Expression>, Box<Expression>, bool), // a [NOT] LIKE b
    ILike(Box<Expression>, Box<Expression>, bool), // a [NOT] ILIKE b

    // IN and BETWEEN operators
    InList {
        expr: Box<Expression>,
        list: Vec<Expression>,
        negated: bool,
    }, // a [NOT] IN (b, c, d)
    Between {
        expr: Box<Expression>,
        low: Box<Expression>,
        high: Box<Expression>,
        negated: bool,
    }, // a [NOT] BETWEEN b AND c
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Expression::Literal(literal)
    }
}

impl From<Operator> for Expression {
    fn from(operator: Operator) -> Self {
        Expression::Operator(operator)
    }
}

impl Expression {
    /// Walks the expression tree depth-first, calling a closure for every
    /// node. Halts and returns false if the closure returns false.
    pub fn walk(&self, visitor: &mut impl FnMut(&Expression) -> bool) -> bool {
        use Operator::*;

        if !visitor(self) {
            return false;
        }

        match self {
            Self::Operator(op) => match op {
                Add(lhs, rhs)
                | And(lhs, rhs)
                | Divide(lhs, rhs)
                | Equal(lhs, rhs)
                | GreaterThan(lhs, rhs)
                | GreaterThanOrEqual(lhs, rhs)
                | LessThan(lhs, rhs)
                | LessThanOrEqual(lhs, rhs)
                | Multiply(lhs, rhs)
                | NotEqual(lhs, rhs)
                | Or(lhs, rhs)
                | Remainder(lhs, rhs)
                | Subtract(lhs, rhs) => lhs.walk(visitor) && rhs.walk(visitor),

                Like(lhs, rhs, _) | ILike(lhs, rhs, _) => {
                    lhs.walk(visitor) && rhs.walk(visitor)
                }

                Identity(expr) | IsNull(expr, _) | Negate(expr) | Not(expr) => expr.walk(visitor),

                InList { expr, list, .. } => {
                    expr.walk(visitor) && list.iter().all(|e| e.walk(visitor))
                }

                Between {
                    expr, low, high, ..
                } => expr.walk(visitor) && low.walk(visitor) && high.walk(visitor),
            },

            Self::Function(_, exprs) => exprs.iter().all(|expr| expr.walk(visitor)),

            Self::Cast(expr, _) => expr.walk(visitor),

            Self::All | Self::Column(_, _) | Self::Literal(_) => true,
        }
    }

    /// Transforms the expression tree depth-first, applying a closure to
    /// every node and replacing the node with the returned value.
    pub fn transform<E>(
        &mut self,
        transformer: &mut impl FnMut(&mut Expression) -> std::result::Result<(), E>,
    ) -> std::result::Result<(), E> {
        use Operator::*;

        // Transform children first.
        match self {
            Self::Operator(op) => match op {
                Add(lhs, rhs)
                | And(lhs, rhs)
                | Divide(lhs, rhs)
                | Equal(lhs, rhs)
                | GreaterThan(lhs, rhs)
                | GreaterThanOrEqual(lhs, rhs)
                | LessThan(lhs, rhs)
                | LessThanOrEqual(lhs, rhs)
                | Multiply(lhs, rhs)
                | NotEqual(lhs, rhs)
                | Or(lhs, rhs)
                | Remainder(lhs, rhs)
                | Subtract(lhs, rhs) => {
                    lhs.transform(transformer)?;
                    rhs.transform(transformer)?;
                }

                Like(lhs, rhs, _) | ILike(lhs, rhs, _) => {
                    lhs.transform(transformer)?;
                    rhs.transform(transformer)?;
                }

                Identity(expr) | IsNull(expr, _) | Negate(expr) | Not(expr) => {
                    expr.transform(transformer)?
                }

                InList { expr, list, .. } => {
                    expr.transform(transformer)?;
                    for item in list {
                        item.transform(transformer)?;
                    }
                }

                Between {
                    expr, low, high, ..
                } => {
                    expr.transform(transformer)?;
                    low.transform(transformer)?;
                    high.transform(transformer)?;
                }
            },

            Self::Function(_, exprs) => {
                for expr in exprs {
                    expr.transform(transformer)?;
                }
            }

            Self::Cast(expr, _) => expr.transform(transformer)?,

            Self::All | Self::Column(_, _) | Self::Literal(_) => {}
        }

        // Transform the current node.
        transformer(self)
    }
}

/// Sort direction for ORDER BY keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A table in the FROM clause, with raw (unresolved) names.
#[derive(Clone, Debug, PartialEq)]
pub struct FromTable {
    pub name: String,
    pub alias: Option<String>,
}

/// A JOIN clause tied to one secondary table.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinClause {
    pub table: FromTable,
    /// ON condition, unresolved
    pub on: Expression,
}

/// A raw SELECT statement: clauses split apart, names unresolved.
///
/// This is the preparse output; forward references (e.g. a WHERE clause
/// naming a joined table) are tolerated until semantic analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectStatement {
    /// Whether to deduplicate result rows.
    pub distinct: bool,
    /// Expressions to select, with an optional column alias.
    pub select: Vec<(Expression, Option<String>)>,
    /// FROM: the primary table.
    pub from: FromTable,
    /// JOIN clauses, one per secondary table.
    pub joins: Vec<JoinClause>,
    /// WHERE: optional condition to filter records.
    pub r#where: Option<Expression>,
    /// ORDER BY: expressions to sort by, with direction.
    pub order_by: Vec<(Expression, Direction)>,
    /// LIMIT: maximum number of rows to return.
    pub limit: Option<u64>,
    /// OFFSET: row offset to start from.
    pub offset: Option<u64>,
    /// UNION ALL: the next member of the union chain, if any.
    pub union_next: Option<Box<SelectStatement>>,
}

//! The parser takes tokens from the lexer and builds the syntax tree.
//!
//! Expressions are parsed with precedence climbing. Relative precedence,
//! where 1 is the lowest:
//!
//! * 1: OR
//! * 2: AND
//! * 3: NOT
//! * 4: =, !=, LIKE, ILIKE, IS, IN, BETWEEN
//! * 5: <, <=, >, >=
//! * 6: +, - (infix)
//! * 7: *, /, %
//! * 10: +, - (prefix)
//!
//! Left-associative operators get a +1 to their precedence so they bind
//! tighter to their left operand than right-associative operators.

use super::ast::{
    Direction, Expression, FromTable, JoinClause, Literal, Operator, SelectStatement,
};
use super::lexer::{Keyword, Lexer, Token};
use crate::error::{Error, Result};
use crate::types::DataType;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::ops::Add;

/// Maximum nesting depth of parsed expressions. Exceeding it is an error
/// rather than a stack overflow.
pub const MAX_EXPRESSION_DEPTH: usize = 128;

/// Operator precedence.
type Precedence = u8;

/// Operator associativity.
enum Associativity {
    Left,
    Right,
}

impl Add<Associativity> for Precedence {
    type Output = Self;

    fn add(self, rhs: Associativity) -> Self {
        // Left-associative operators have increased precedence, so they
        // bind tighter to their left-hand side.
        self + match rhs {
            Associativity::Left => 1,
            Associativity::Right => 0,
        }
    }
}

/// Prefix operators.
enum PrefixOperator {
    Minus, // -a
    Not,   // NOT a
    Plus,  // +a
}

impl PrefixOperator {
    fn precedence(&self) -> Precedence {
        match self {
            Self::Not => 3,
            Self::Minus | Self::Plus => 10,
        }
    }

    // Prefix operators are right-associative by definition.
    fn associativity(&self) -> Associativity {
        Associativity::Right
    }

    fn into_expression(self, rhs: Expression) -> Expression {
        let rhs = Box::new(rhs);
        match self {
            Self::Plus => Operator::Identity(rhs).into(),
            Self::Minus => Operator::Negate(rhs).into(),
            Self::Not => Operator::Not(rhs).into(),
        }
    }
}

/// Infix operators.
enum InfixOperator {
    Add,                // a + b
    And,                // a AND b
    Divide,             // a / b
    Equal,              // a = b
    GreaterThan,        // a > b
    GreaterThanOrEqual, // a >= b
    LessThan,           // a < b
    LessThanOrEqual,    // a <= b
    Multiply,           // a * b
    NotEqual,           // a != b
    Or,                 // a OR b
    Remainder,          // a % b
    Subtract,           // a - b
}

impl InfixOperator {
    fn precedence(&self) -> Precedence {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Equal | Self::NotEqual => 4,
            Self::GreaterThan
            | Self::GreaterThanOrEqual
            | Self::LessThan
            | Self::LessThanOrEqual => 5,
            Self::Add | Self::Subtract => 6,
            Self::Multiply | Self::Divide | Self::Remainder => 7,
        }
    }

    fn associativity(&self) -> Associativity {
        Associativity::Left
    }

    fn into_expression(self, lhs: Expression, rhs: Expression) -> Expression {
        let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));
        match self {
            Self::Add => Operator::Add(lhs, rhs).into(),
            Self::And => Operator::And(lhs, rhs).into(),
            Self::Divide => Operator::Divide(lhs, rhs).into(),
            Self::Equal => Operator::Equal(lhs, rhs).into(),
            Self::GreaterThan => Operator::GreaterThan(lhs, rhs).into(),
            Self::GreaterThanOrEqual => Operator::GreaterThanOrEqual(lhs, rhs).into(),
            Self::LessThan => Operator::LessThan(lhs, rhs).into(),
            Self::LessThanOrEqual => Operator::LessThanOrEqual(lhs, rhs).into(),
            Self::Multiply => Operator::Multiply(lhs, rhs).into(),
            Self::NotEqual => Operator::NotEqual(lhs, rhs).into(),
            Self::Or => Operator::Or(lhs, rhs).into(),
            Self::Remainder => Operator::Remainder(lhs, rhs).into(),
            Self::Subtract => Operator::Subtract(lhs, rhs).into(),
        }
    }
}

/// Postfix operator families: IS NULL, LIKE, IN and BETWEEN, each with an
/// optional leading NOT. These parse their own right-hand operands.
enum PostfixOperator {
    IsNull(bool),                          // a IS [NOT] NULL
    Like(Expression, bool),                // a [NOT] LIKE pattern
    ILike(Expression, bool),               // a [NOT] ILIKE pattern
    InList(Vec<Expression>, bool),         // a [NOT] IN (list)
    Between(Expression, Expression, bool), // a [NOT] BETWEEN low AND high
}

impl PostfixOperator {
    /// All postfix operators share the comparison precedence level.
    const PRECEDENCE: Precedence = 4;

    fn into_expression(self, lhs: Expression) -> Expression {
        let lhs = Box::new(lhs);
        match self {
            Self::IsNull(negated) => Operator::IsNull(lhs, negated).into(),
            Self::Like(pattern, negated) => {
                Operator::Like(lhs, Box::new(pattern), negated).into()
            }
            Self::ILike(pattern, negated) => {
                Operator::ILike(lhs, Box::new(pattern), negated).into()
            }
            Self::InList(list, negated) => Operator::InList {
                expr: lhs,
                list,
                negated,
            }
            .into(),
            Self::Between(low, high, negated) => Operator::Between {
                expr: lhs,
                low: Box::new(low),
                high: Box::new(high),
                negated,
            }
            .into(),
        }
    }
}

/// The parser. Tracks the start position of the current token so errors
/// are anchored at the last valid cursor position.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// One-token lookahead buffer; lexer errors are held here so they are
    /// not lost across a peek.
    peeked: Option<Result<Option<(usize, Token)>>>,
    /// Start offset of the most recently observed token
    pos: usize,
    /// Current expression nesting depth
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given string.
    pub fn new(input: &'a str) -> Parser<'a> {
        Parser {
            lexer: Lexer::new(input),
            peeked: None,
            pos: 0,
            depth: 0,
        }
    }

    /// Parses the input as a single bare expression (e.g. a WHERE clause).
    /// The entire string must be consumed.
    pub fn parse_expression_text(input: &'a str) -> Result<Expression> {
        let mut parser = Parser::new(input);
        let expr = parser.parse_expression()?;
        parser.expect_end()?;
        Ok(expr)
    }

    /// Parses the input as a SELECT statement, including any UNION ALL
    /// chain. The entire string must be consumed.
    pub fn parse_select_text(input: &'a str) -> Result<SelectStatement> {
        let mut parser = Parser::new(input);
        let select = parser.parse_select()?;
        parser.expect_end()?;
        Ok(select)
    }

    fn syntax_error(&self, message: impl Into<String>) -> Error {
        Error::syntax(message, self.pos)
    }

    /// Fills the peek buffer with the next token, if empty.
    fn fill(&mut self) {
        if self.peeked.is_none() {
            let token = self.lexer.next().transpose();
            let start = self.lexer.token_start();
            self.pos = start;
            self.peeked = Some(token.map(|t| t.map(|t| (start, t))));
        }
    }

    /// Peeks the next token, if any, without consuming it.
    fn peek(&mut self) -> Result<Option<&Token>> {
        self.fill();
        match self.peeked.as_ref().unwrap() {
            Ok(token) => Ok(token.as_ref().map(|(_, t)| t)),
            Err(err) => Err(err.clone()),
        }
    }

    /// Fetches the next token, or errors if none is found.
    fn next(&mut self) -> Result<Token> {
        self.fill();
        match self.peeked.take().unwrap()? {
            Some((start, token)) => {
                self.pos = start;
                Ok(token)
            }
            None => Err(self.syntax_error("unexpected end of input")),
        }
    }

    /// Returns the next identifier, or errors if not found.
    fn next_ident(&mut self) -> Result<String> {
        match self.next()? {
            Token::Ident(ident) => Ok(ident),
            token => Err(self.syntax_error(format!("expected identifier, found {}", token))),
        }
    }

    /// Consumes the next token if it satisfies the predicate.
    fn next_if(&mut self, predicate: impl Fn(&Token) -> bool) -> Option<Token> {
        let matched = matches!(self.peek(), Ok(Some(token)) if predicate(token));
        if matched { self.next().ok() } else { None }
    }

    /// Passes the next token through the closure, consuming it if the
    /// closure returns Some.
    fn next_if_map<T>(&mut self, f: impl Fn(&Token) -> Option<T>) -> Option<T> {
        let value = match self.peek() {
            Ok(Some(token)) => f(token)?,
            _ => return None,
        };
        self.next().ok()?;
        Some(value)
    }

    /// Consumes the next token if it is the given token, returning true.
    fn next_is(&mut self, token: Token) -> bool {
        self.next_if(|t| t == &token).is_some()
    }

    /// Consumes the next token if it's the expected token, or errors.
    fn expect(&mut self, expect: Token) -> Result<()> {
        let token = self.next()?;
        if token != expect {
            return Err(self.syntax_error(format!("expected {}, found {}", expect, token)));
        }
        Ok(())
    }

    /// Errors unless the input is exhausted (modulo a trailing semicolon).
    fn expect_end(&mut self) -> Result<()> {
        self.next_is(Token::Semicolon);
        if let Some(token) = self.peek()? {
            let token = token.clone();
            return Err(self.syntax_error(format!("unexpected token {}", token)));
        }
        Ok(())
    }

    /// Guards expression recursion depth, failing with a structured error
    /// instead of overflowing the call stack.
    fn enter(&mut self) -> Result<()> {
        if self.depth >= MAX_EXPRESSION_DEPTH {
            return Err(Error::RecursionLimitExceeded(MAX_EXPRESSION_DEPTH));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Parses an expression.
    pub fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_expression_at(0)
    }

    /// Parses an expression at the given minimum precedence.
    fn parse_expression_at(&mut self, min_precedence: Precedence) -> Result<Expression> {
        self.enter()?;

        // If the left-hand side is a prefix operator, recursively parse it
        // and its operand. Otherwise, parse the left-hand side as an atom.
        let mut lhs = if let Some(prefix) = self.parse_prefix_operator_at(min_precedence) {
            let next_precedence = prefix.precedence() + prefix.associativity();
            let rhs = self.parse_expression_at(next_precedence)?;
            prefix.into_expression(rhs)
        } else {
            self.parse_expression_atom()?
        };

        // Apply any postfix operators to the left-hand side.
        while let Some(postfix) = self.parse_postfix_operator_at(min_precedence)? {
            lhs = postfix.into_expression(lhs)
        }

        // Repeatedly apply any infix operators as long as their precedence
        // is at or above the current minimum (i.e. that of the upstack
        // operator). The right-hand side parse recursively consumes any
        // tighter-binding operators.
        while let Some(infix) = self.parse_infix_operator_at(min_precedence) {
            let next_precedence = infix.precedence() + infix.associativity();
            let rhs = self.parse_expression_at(next_precedence)?;
            lhs = infix.into_expression(lhs, rhs);
        }

        // Apply any postfix operators after the binary operator. Consider
        // e.g. 1 + population IS NULL.
        while let Some(postfix) = self.parse_postfix_operator_at(min_precedence)? {
            lhs = postfix.into_expression(lhs)
        }

        self.leave();
        Ok(lhs)
    }

    /// Parses an expression atom: a literal, a column name, a function
    /// call, a CAST, or a parenthesized expression.
    fn parse_expression_atom(&mut self) -> Result<Expression> {
        Ok(match self.next()? {
            // All columns (in COUNT(*) and SELECT lists).
            Token::Asterisk => Expression::All,

            Token::Number(n) => classify_number(&n)
                .map(Expression::Literal)
                .ok_or_else(|| self.syntax_error(format!("invalid number: {}", n)))?,
            Token::String(s) => Literal::String(s).into(),
            Token::Keyword(Keyword::True) => Literal::Boolean(true).into(),
            Token::Keyword(Keyword::False) => Literal::Boolean(false).into(),
            Token::Keyword(Keyword::Null) => Literal::Null.into(),

            // Tagged temporal literals: DATE '...', TIME '...',
            // TIMESTAMP '...'.
            Token::Keyword(Keyword::Date) => {
                let s = self.next_string()?;
                let date = NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .map_err(|_| self.syntax_error(format!("invalid date '{}'", s)))?;
                Literal::Date(date).into()
            }
            Token::Keyword(Keyword::Time) => {
                let s = self.next_string()?;
                let time = NaiveTime::parse_from_str(&s, "%H:%M:%S")
                    .map_err(|_| self.syntax_error(format!("invalid time '{}'", s)))?;
                Literal::Time(time).into()
            }
            Token::Keyword(Keyword::Timestamp) => {
                let s = self.next_string()?;
                let ts = NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
                    .map_err(|_| self.syntax_error(format!("invalid timestamp '{}'", s)))?;
                Literal::Timestamp(ts).into()
            }

            // CAST(expr AS type)
            Token::Keyword(Keyword::Cast) => {
                self.expect(Token::OpenParen)?;
                let expr = self.parse_expression()?;
                self.expect(Keyword::As.into())?;
                let to = self.parse_type()?;
                self.expect(Token::CloseParen)?;
                Expression::Cast(Box::new(expr), to)
            }

            // Function call. DISTINCT inside an aggregate call is encoded
            // by suffixing the function name, e.g. COUNT_DISTINCT.
            Token::Ident(name) if self.next_is(Token::OpenParen) => {
                let distinct = self.next_is(Keyword::Distinct.into());
                let mut args = Vec::new();
                while !self.next_is(Token::CloseParen) {
                    if !args.is_empty() {
                        self.expect(Token::Comma)?;
                    }
                    args.push(self.parse_expression()?);
                }
                if distinct {
                    Expression::Function(format!("{}_DISTINCT", name.to_uppercase()), args)
                } else {
                    Expression::Function(name, args)
                }
            }

            // Column name, either qualified as table.column or unqualified.
            Token::Ident(table) if self.next_is(Token::Period) => {
                Expression::Column(Some(table), self.next_ident()?)
            }
            Token::Ident(column) => Expression::Column(None, column),

            // Parenthesized expression.
            Token::OpenParen => {
                let expr = self.parse_expression()?;
                self.expect(Token::CloseParen)?;
                expr
            }

            token => {
                return Err(self.syntax_error(format!("expected expression, found {}", token)));
            }
        })
    }

    /// Returns the next string literal, or errors.
    fn next_string(&mut self) -> Result<String> {
        match self.next()? {
            Token::String(s) => Ok(s),
            token => Err(self.syntax_error(format!("expected string literal, found {}", token))),
        }
    }

    /// Parses a cast target type. An optional parenthesized length or
    /// precision (e.g. VARCHAR(32)) is accepted and discarded.
    pub fn parse_type(&mut self) -> Result<DataType> {
        let data_type = match self.next()? {
            Token::Keyword(Keyword::Integer) => DataType::I32,
            Token::Keyword(Keyword::Bigint) => DataType::I64,
            Token::Keyword(Keyword::Float) | Token::Keyword(Keyword::Double) => DataType::F64,
            Token::Keyword(Keyword::Varchar) | Token::Keyword(Keyword::Character) => DataType::Str,
            Token::Keyword(Keyword::Boolean) => DataType::Bool,
            Token::Keyword(Keyword::Date) => DataType::Date,
            Token::Keyword(Keyword::Time) => DataType::Time,
            Token::Keyword(Keyword::Timestamp) => DataType::Timestamp,
            Token::Keyword(Keyword::Geometry) => DataType::Geometry,
            token => {
                return Err(self.syntax_error(format!("expected type name, found {}", token)));
            }
        };
        if self.next_is(Token::OpenParen) {
            loop {
                match self.next()? {
                    Token::Number(_) | Token::Comma => continue,
                    Token::CloseParen => break,
                    token => {
                        return Err(
                            self.syntax_error(format!("expected type length, found {}", token))
                        );
                    }
                }
            }
        }
        Ok(data_type)
    }

    /// Parses a prefix operator at or above min_precedence, if present.
    fn parse_prefix_operator_at(&mut self, min_precedence: Precedence) -> Option<PrefixOperator> {
        self.next_if_map(|token| {
            let operator = match token {
                Token::Keyword(Keyword::Not) => PrefixOperator::Not,
                Token::Minus => PrefixOperator::Minus,
                Token::Plus => PrefixOperator::Plus,
                _ => return None,
            };
            Some(operator).filter(|op| op.precedence() >= min_precedence)
        })
    }

    /// Parses an infix operator at or above min_precedence, if present.
    fn parse_infix_operator_at(&mut self, min_precedence: Precedence) -> Option<InfixOperator> {
        self.next_if_map(|token| {
            let operator = match token {
                Token::Asterisk => InfixOperator::Multiply,
                Token::Equal => InfixOperator::Equal,
                Token::GreaterThan => InfixOperator::GreaterThan,
                Token::GreaterThanOrEqual => InfixOperator::GreaterThanOrEqual,
                Token::Keyword(Keyword::And) => InfixOperator::And,
                Token::Keyword(Keyword::Or) => InfixOperator::Or,
                Token::LessThan => InfixOperator::LessThan,
                Token::LessThanOrEqual => InfixOperator::LessThanOrEqual,
                Token::Minus => InfixOperator::Subtract,
                Token::NotEqual => InfixOperator::NotEqual,
                Token::Percent => InfixOperator::Remainder,
                Token::Plus => InfixOperator::Add,
                Token::Slash => InfixOperator::Divide,
                _ => return None,
            };
            Some(operator).filter(|op| op.precedence() >= min_precedence)
        })
    }

    /// Parses a postfix operator at or above min_precedence, if present.
    /// These consume their own right-hand operands.
    fn parse_postfix_operator_at(
        &mut self,
        min_precedence: Precedence,
    ) -> Result<Option<PostfixOperator>> {
        if min_precedence > PostfixOperator::PRECEDENCE {
            return Ok(None);
        }

        // A NOT here must be followed by LIKE, ILIKE, IN or BETWEEN;
        // otherwise it is not ours to consume.
        let negated = match self.peek()? {
            Some(Token::Keyword(Keyword::Not)) => {
                // Peek one token further by consuming NOT only when the
                // following token starts a negatable postfix operator.
                self.next()?;
                match self.peek()? {
                    Some(Token::Keyword(
                        Keyword::Like | Keyword::ILike | Keyword::In | Keyword::Between,
                    )) => true,
                    _ => {
                        return Err(
                            self.syntax_error("expected LIKE, ILIKE, IN or BETWEEN after NOT")
                        );
                    }
                }
            }
            _ => false,
        };

        let operator = match self.peek()? {
            Some(Token::Keyword(Keyword::Is)) if !negated => {
                self.next()?;
                let is_not = self.next_is(Keyword::Not.into());
                self.expect(Keyword::Null.into())?;
                PostfixOperator::IsNull(is_not)
            }
            Some(Token::Keyword(Keyword::Like)) => {
                self.next()?;
                let pattern = self.parse_expression_at(5)?;
                PostfixOperator::Like(pattern, negated)
            }
            Some(Token::Keyword(Keyword::ILike)) => {
                self.next()?;
                let pattern = self.parse_expression_at(5)?;
                PostfixOperator::ILike(pattern, negated)
            }
            Some(Token::Keyword(Keyword::In)) => {
                self.next()?;
                self.expect(Token::OpenParen)?;
                let mut list = Vec::new();
                while !self.next_is(Token::CloseParen) {
                    if !list.is_empty() {
                        self.expect(Token::Comma)?;
                    }
                    list.push(self.parse_expression()?);
                }
                PostfixOperator::InList(list, negated)
            }
            Some(Token::Keyword(Keyword::Between)) => {
                self.next()?;
                let low = self.parse_expression_at(5)?;
                self.expect(Keyword::And.into())?;
                let high = self.parse_expression_at(5)?;
                PostfixOperator::Between(low, high, negated)
            }
            _ if negated => unreachable!("NOT consumed without a negatable operator"),
            _ => return Ok(None),
        };

        Ok(Some(operator))
    }

    /// Parses a SELECT statement, including any UNION ALL chain.
    pub fn parse_select(&mut self) -> Result<SelectStatement> {
        let mut select = self.parse_select_member()?;
        let mut tail = &mut select;
        while self.next_is(Keyword::Union.into()) {
            self.expect(Keyword::All.into())?;
            tail.union_next = Some(Box::new(self.parse_select_member()?));
            tail = tail.union_next.as_mut().unwrap();
        }
        Ok(select)
    }

    /// Parses one member of a union chain.
    fn parse_select_member(&mut self) -> Result<SelectStatement> {
        self.expect(Keyword::Select.into())?;
        let distinct = self.next_is(Keyword::Distinct.into());
        let select = self.parse_select_clause()?;
        self.expect(Keyword::From.into())?;
        let from = self.parse_from_table()?;
        let joins = self.parse_joins()?;
        let r#where = if self.next_is(Keyword::Where.into()) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let order_by = self.parse_order_by()?;
        let (limit, offset) = self.parse_limit_offset()?;
        Ok(SelectStatement {
            distinct,
            select,
            from,
            joins,
            r#where,
            order_by,
            limit,
            offset,
            union_next: None,
        })
    }

    /// Parses the SELECT item list: expressions with optional aliases.
    fn parse_select_clause(&mut self) -> Result<Vec<(Expression, Option<String>)>> {
        let mut select = Vec::new();
        loop {
            let expr = self.parse_expression()?;
            let alias = if self.next_is(Keyword::As.into()) {
                Some(self.next_ident()?)
            } else {
                self.next_if_map(|token| match token {
                    Token::Ident(ident) => Some(ident.clone()),
                    _ => None,
                })
            };
            select.push((expr, alias));
            if !self.next_is(Token::Comma) {
                break;
            }
        }
        Ok(select)
    }

    /// Parses a table reference with an optional alias.
    fn parse_from_table(&mut self) -> Result<FromTable> {
        let name = self.next_ident()?;
        let alias = if self.next_is(Keyword::As.into()) {
            Some(self.next_ident()?)
        } else {
            self.next_if_map(|token| match token {
                Token::Ident(ident) => Some(ident.clone()),
                _ => None,
            })
        };
        Ok(FromTable { name, alias })
    }

    /// Parses any JOIN clauses. Only inner/left equi-joins against
    /// secondary tables are supported; the join kind does not affect
    /// compilation, so it is accepted and not recorded.
    fn parse_joins(&mut self) -> Result<Vec<JoinClause>> {
        let mut joins = Vec::new();
        loop {
            let ahead = self.peek()?;
            let is_join = matches!(
                ahead,
                Some(Token::Keyword(Keyword::Join | Keyword::Inner | Keyword::Left))
            );
            if !is_join {
                break;
            }
            // The join kind prefix does not affect compilation.
            if !self.next_is(Keyword::Inner.into()) {
                self.next_is(Keyword::Left.into());
            }
            self.expect(Keyword::Join.into())?;
            let table = self.parse_from_table()?;
            self.expect(Keyword::On.into())?;
            let on = self.parse_expression()?;
            joins.push(JoinClause { table, on });
        }
        Ok(joins)
    }

    /// Parses an ORDER BY clause, if present.
    fn parse_order_by(&mut self) -> Result<Vec<(Expression, Direction)>> {
        let mut order_by = Vec::new();
        if !self.next_is(Keyword::Order.into()) {
            return Ok(order_by);
        }
        self.expect(Keyword::By.into())?;
        loop {
            let expr = self.parse_expression()?;
            let direction = if self.next_is(Keyword::Desc.into()) {
                Direction::Descending
            } else {
                self.next_is(Keyword::Asc.into());
                Direction::Ascending
            };
            order_by.push((expr, direction));
            if !self.next_is(Token::Comma) {
                break;
            }
        }
        Ok(order_by)
    }

    /// Parses LIMIT and OFFSET clauses in either order.
    fn parse_limit_offset(&mut self) -> Result<(Option<u64>, Option<u64>)> {
        let mut limit = None;
        let mut offset = None;
        loop {
            if limit.is_none() && self.next_is(Keyword::Limit.into()) {
                limit = Some(self.next_unsigned()?);
            } else if offset.is_none() && self.next_is(Keyword::Offset.into()) {
                offset = Some(self.next_unsigned()?);
            } else {
                break;
            }
        }
        Ok((limit, offset))
    }

    /// Returns the next unsigned integer literal, or errors.
    fn next_unsigned(&mut self) -> Result<u64> {
        match self.next()? {
            Token::Number(n) => n
                .parse()
                .map_err(|_| self.syntax_error(format!("expected unsigned integer, found {}", n))),
            token => {
                Err(self.syntax_error(format!("expected unsigned integer, found {}", token)))
            }
        }
    }
}

/// Classifies a numeric literal. Integers that fit in 32 bits become
/// `Integer`, wider ones `BigInt`; a decimal point, exponent or 64-bit
/// overflow yields `Float`. This is a stable policy, relied on by the
/// type checker.
pub fn classify_number(text: &str) -> Option<Literal> {
    if !text.contains(['.', 'e', 'E']) {
        if let Ok(value) = text.parse::<i64>() {
            return Some(match i32::try_from(value) {
                Ok(value) => Literal::Integer(value),
                Err(_) => Literal::BigInt(value),
            });
        }
    }
    text.parse::<f64>().ok().map(Literal::Float)
}

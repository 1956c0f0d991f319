//! Parsing: raw query text into an unresolved syntax tree
//!
//! The parser only ensures the syntax is well-formed; whether referenced
//! tables and columns exist, and whether operand types line up, is the job
//! of the semantic analyzer.

pub mod ast;
mod lexer;
mod parser;

pub use lexer::{Keyword, Lexer, Token};
pub use parser::{classify_number, Parser, MAX_EXPRESSION_DEPTH};

use crate::error::Result;

/// Parse a bare expression string (e.g. a WHERE clause) into an AST.
pub fn parse_expression(text: &str) -> Result<ast::Expression> {
    Parser::parse_expression_text(text)
}

/// Parse a SELECT statement string, including any UNION ALL chain.
pub fn parse_select(text: &str) -> Result<ast::SelectStatement> {
    Parser::parse_select_text(text)
}

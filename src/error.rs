//! Error types for the expression and select compiler

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Compile-time errors
    #[error("syntax error at position {position}: {message}")]
    Syntax { message: String, position: usize },

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("ambiguous column: {0}")]
    AmbiguousColumn(String),

    #[error("unknown table: {0}")]
    UnknownTable(String),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("unsupported custom function: {0}")]
    UnsupportedCustomFunction(String),

    #[error("unsupported cast from {from} to {to}")]
    UnsupportedCast { from: String, to: String },

    #[error("expression exceeds maximum depth of {0}")]
    RecursionLimitExceeded(usize),

    // Runtime errors
    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("execution error: {0}")]
    Execution(String),
}

impl Error {
    /// Shorthand for a syntax error anchored at a cursor position.
    pub fn syntax(message: impl Into<String>, position: usize) -> Self {
        Error::Syntax {
            message: message.into(),
            position,
        }
    }
}

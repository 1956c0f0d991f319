//! Data types for catalog fields and expression results

use serde::{Deserialize, Serialize};
use std::fmt;

/// The type of a catalog field or of a checked expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    // Boolean
    Bool,
    // Integer types
    I32,
    I64,
    // Float type
    F64,
    // String type
    Str,
    // Date/Time types
    Date,
    Time,
    Timestamp,
    // Geometry payload (WKT + optional SRID)
    Geometry,
    // Null handling
    Nullable(Box<DataType>),
    // Explicit Null type (for NULL literals)
    Null,
}

impl DataType {
    /// Strips any Nullable wrapper.
    pub fn base_type(&self) -> &DataType {
        match self {
            DataType::Nullable(inner) => inner.base_type(),
            _ => self,
        }
    }

    /// Check if this type is numeric (integer or float)
    pub fn is_numeric(&self) -> bool {
        matches!(
            self.base_type(),
            DataType::I32 | DataType::I64 | DataType::F64
        )
    }

    /// Check if this type is an integer
    pub fn is_integer(&self) -> bool {
        matches!(self.base_type(), DataType::I32 | DataType::I64)
    }

    /// Check if this type is a string
    pub fn is_string(&self) -> bool {
        matches!(self.base_type(), DataType::Str)
    }

    /// Check if this type is a date, time or timestamp
    pub fn is_temporal(&self) -> bool {
        matches!(
            self.base_type(),
            DataType::Date | DataType::Time | DataType::Timestamp
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Bool => write!(f, "BOOLEAN"),
            DataType::I32 => write!(f, "INTEGER"),
            DataType::I64 => write!(f, "BIGINT"),
            DataType::F64 => write!(f, "DOUBLE"),
            DataType::Str => write!(f, "VARCHAR"),
            DataType::Date => write!(f, "DATE"),
            DataType::Time => write!(f, "TIME"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
            DataType::Geometry => write!(f, "GEOMETRY"),
            DataType::Nullable(inner) => write!(f, "{} NULL", inner),
            DataType::Null => write!(f, "NULL"),
        }
    }
}

/// Promote two numeric types to a common result type for arithmetic.
///
/// Integer operands of different widths promote to the wider integer;
/// any float operand promotes the result to float. Non-numeric operands
/// are a type mismatch.
pub fn promote_numeric_types(
    left: &DataType,
    right: &DataType,
) -> crate::error::Result<DataType> {
    use DataType::*;

    if !left.is_numeric() || !right.is_numeric() {
        return Err(crate::error::Error::TypeMismatch {
            expected: "numeric types".into(),
            found: format!("{} and {}", left, right),
        });
    }

    Ok(match (left.base_type(), right.base_type()) {
        (I32, I32) => I32,
        (I32, I64) | (I64, I32) | (I64, I64) => I64,
        _ => F64,
    })
}

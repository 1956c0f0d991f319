//! Core traits for operators

use crate::error::Result;
use crate::types::{DataType, Value};

/// Trait for binary operators (two operands)
pub trait BinaryOperator: Send + Sync {
    /// Get operator name for error messages
    fn name(&self) -> &'static str;

    /// Get operator symbol for display
    fn symbol(&self) -> &'static str;

    /// Validate operand types and return the result type
    fn validate(&self, left: &DataType, right: &DataType) -> Result<DataType>;

    /// Execute the operation
    fn execute(&self, left: &Value, right: &Value) -> Result<Value>;

    /// Check if this operator is commutative (a op b = b op a)
    fn is_commutative(&self) -> bool {
        false
    }
}

/// Trait for unary operators (one operand)
pub trait UnaryOperator: Send + Sync {
    /// Get operator name for error messages
    fn name(&self) -> &'static str;

    /// Get operator symbol for display
    fn symbol(&self) -> &'static str;

    /// Validate the operand type and return the result type
    fn validate(&self, operand: &DataType) -> Result<DataType>;

    /// Execute the operation
    fn execute(&self, operand: &Value) -> Result<Value>;
}

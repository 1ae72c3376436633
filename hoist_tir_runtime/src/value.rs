//! Scalar values produced by expression evaluation

use crate::error::{RuntimeError, RuntimeResult};
use std::fmt;

/// Result of evaluating an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    /// 64-bit signed integer
    Int(i64),
    /// Boolean
    Bool(bool),
}

impl Value {
    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::Bool(_) => "Bool",
        }
    }

    /// Extract as i64, or fail with a type error
    pub fn as_int(&self) -> RuntimeResult<i64> {
        match self {
            Value::Int(v) => Ok(*v),
            other => Err(RuntimeError::type_error(format!(
                "expected Int, got {}",
                other.type_name()
            ))),
        }
    }

    /// Extract as bool, or fail with a type error
    pub fn as_bool(&self) -> RuntimeResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(RuntimeError::type_error(format!(
                "expected Bool, got {}",
                other.type_name()
            ))),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

//! Runtime error types for the loop nest interpreter
//!
//! This module provides the errors that can occur while executing a
//! lowered function.

use thiserror::Error;

/// Runtime error type
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    /// Type mismatch error
    #[error("TypeError: {0}")]
    TypeError(String),

    /// Variable read before any binding
    #[error("UnboundVariable: {0} is not bound")]
    UnboundVariable(String),

    /// Buffer not passed to the function
    #[error("UnknownBuffer: {0} was not passed to the function")]
    UnknownBuffer(String),

    /// Call to a function missing from the interpreter's function table
    #[error("UnknownFunction: no function named {0}")]
    UnknownFunction(String),

    /// Index out of bounds error
    #[error("BoundsError: attempt to access index {index} of buffer {buffer} with length {length}")]
    BoundsError {
        /// Buffer name
        buffer: String,
        /// Attempted index
        index: i64,
        /// Buffer length
        length: usize,
    },

    /// Division by zero error
    #[error("DivisionByZero: integer division by zero")]
    DivisionByZero,

    /// Loop with a negative trip count
    #[error("NegativeExtent: loop over {var} has extent {extent}")]
    NegativeExtent {
        /// Loop variable
        var: String,
        /// Evaluated extent
        extent: i64,
    },

    /// Invalid argument error
    #[error("ArgumentError: {0}")]
    ArgumentError(String),

    /// Overflow error
    #[error("OverflowError: {0}")]
    OverflowError(String),
}

impl RuntimeError {
    /// Create a type error
    pub fn type_error<S: Into<String>>(msg: S) -> Self {
        RuntimeError::TypeError(msg.into())
    }

    /// Create a bounds error
    pub fn bounds_error<S: Into<String>>(buffer: S, index: i64, length: usize) -> Self {
        RuntimeError::BoundsError {
            buffer: buffer.into(),
            index,
            length,
        }
    }

    /// Create an argument error
    pub fn argument_error<S: Into<String>>(msg: S) -> Self {
        RuntimeError::ArgumentError(msg.into())
    }

    /// Create an overflow error
    pub fn overflow_error<S: Into<String>>(msg: S) -> Self {
        RuntimeError::OverflowError(msg.into())
    }
}

/// Result type alias for interpreter operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

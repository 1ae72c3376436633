//! Error types for IR construction and lowering.
//!
//! Analyses never fail: an expression they cannot reason about is simply
//! unknown. Errors are reserved for malformed trees handed in by the caller
//! and for the configuration and serialization layers.

use crate::ir::Var;
use thiserror::Error;

/// IR error
#[derive(Debug, Error)]
pub enum IrError {
    /// A loop with a constant negative extent
    #[error("Invalid IR: loop over `{var}` has negative extent {extent}")]
    NegativeExtent {
        /// Loop variable
        var: Var,
        /// Offending extent
        extent: i64,
    },

    /// A variable referenced outside any loop or parameter that binds it
    #[error("Invalid IR: unbound variable `{0}`")]
    UnboundVariable(Var),

    /// A loop whose bounds reference its own induction variable
    #[error("Invalid IR: bounds of loop over `{0}` reference the loop variable")]
    SelfReferentialBounds(Var),

    /// Invalid pass configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O failure while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for IR operations
pub type IrResult<T> = Result<T, IrError>;

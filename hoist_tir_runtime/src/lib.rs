//! Reference interpreter for hoist_tir loop nests
//!
//! Executes lowered functions over integer buffers so that rewritten loop
//! nests can be checked against the originals. It includes:
//!
//! - `Value` for scalar results of expression evaluation
//! - `RuntimeError` for error handling
//! - `Buffers`, named and bounds-checked integer storage
//! - `Interpreter`, which runs a `PrimFunc` and records every store

pub mod buffer;
pub mod error;
pub mod exec;
pub mod value;

/// Prelude module for convenient imports
///
/// # Example
/// ```
/// use hoist_tir_runtime::prelude::*;
/// ```
pub mod prelude {
    pub use super::buffer::Buffers;
    pub use super::error::{RuntimeError, RuntimeResult};
    pub use super::exec::{execute, ExecStats, Execution, Function, Interpreter, StoreEvent};
    pub use super::value::Value;
}

pub use prelude::*;

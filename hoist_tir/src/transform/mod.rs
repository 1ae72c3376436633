//! Lowering transformations
//!
//! This module provides the guard-hoisting transformation and the pass
//! pipeline that runs it.

mod hoist_if;
mod pass;
mod pipeline;

// Re-exports
pub use hoist_if::{hoist, ConditionHoister, HoistConfig, HoistStats};
pub use pass::{HoistIfPass, SimplifyPass};
pub use pipeline::{PassPipeline, PassRecord, PassReport};

use crate::error::IrResult;
use crate::ir::PrimFunc;

/// Lowering pass trait
pub trait LoweringPass: std::fmt::Debug {
    /// Name of this pass
    fn name(&self) -> &str;

    /// Run the pass on a function, returning the number of changes made
    fn run_on_function(&mut self, func: &mut PrimFunc) -> IrResult<usize>;
}

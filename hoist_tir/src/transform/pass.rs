//! Built-in lowering passes
//!
//! Each pass wraps one whole-function transformation behind the
//! [`LoweringPass`] trait so the pipeline can run them by name.

use super::hoist_if::{ConditionHoister, HoistConfig, HoistStats};
use super::LoweringPass;
use crate::error::IrResult;
use crate::ir::{PrimFunc, Stmt};
use crate::rewrite::simplify_stmt;

// ============================================================================
// Simplification
// ============================================================================

/// Expression simplification over the whole body
///
/// Folds constants, removes trivial identities, drops decided branches and
/// empty loops.
#[derive(Debug, Default)]
pub struct SimplifyPass;

impl SimplifyPass {
    pub fn new() -> Self {
        Self
    }
}

impl LoweringPass for SimplifyPass {
    fn name(&self) -> &str {
        "simplify"
    }

    fn run_on_function(&mut self, func: &mut PrimFunc) -> IrResult<usize> {
        let simplified = simplify_stmt(&func.body)?;
        if simplified == func.body {
            return Ok(0);
        }
        func.body = simplified;
        Ok(1)
    }
}

// ============================================================================
// Guard hoisting
// ============================================================================

/// Guard hoisting out of split loops
///
/// Reports the number of eliminate, version and split rewrites.
#[derive(Debug, Default)]
pub struct HoistIfPass {
    hoister: ConditionHoister,
}

impl HoistIfPass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HoistConfig) -> Self {
        Self {
            hoister: ConditionHoister::with_config(config),
        }
    }

    /// Counters accumulated over every function this pass has run on
    pub fn stats(&self) -> &HoistStats {
        self.hoister.stats()
    }
}

impl LoweringPass for HoistIfPass {
    fn name(&self) -> &str {
        "hoist_if"
    }

    fn run_on_function(&mut self, func: &mut PrimFunc) -> IrResult<usize> {
        if !self.hoister.config.enabled {
            return Ok(0);
        }
        let before = self.hoister.stats().rewrites();
        let body = std::mem::replace(&mut func.body, Stmt::NoOp);
        func.body = self.hoister.hoist(body);
        Ok(self.hoister.stats().rewrites() - before)
    }
}

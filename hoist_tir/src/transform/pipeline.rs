//! Ordered pass execution with per-pass reporting.

use super::pass::{HoistIfPass, SimplifyPass};
use super::LoweringPass;
use crate::config::LowerConfig;
use crate::error::IrResult;
use crate::ir::PrimFunc;
use crate::rewrite::validate;
use serde::Serialize;

/// Changes made by one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassRecord {
    pub name: String,
    pub changes: usize,
}

/// Outcome of running a pipeline over one function
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Name of the lowered function
    pub function: String,
    /// One record per pass, in execution order
    pub passes: Vec<PassRecord>,
}

impl PassReport {
    pub fn total_changes(&self) -> usize {
        self.passes.iter().map(|p| p.changes).sum()
    }

    /// Changes made by the named pass, if it ran
    pub fn changes_for(&self, name: &str) -> Option<usize> {
        self.passes.iter().find(|p| p.name == name).map(|p| p.changes)
    }

    pub fn to_json(&self) -> IrResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Passes run in insertion order
#[derive(Debug, Default)]
pub struct PassPipeline {
    passes: Vec<Box<dyn LoweringPass>>,
}

impl PassPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard lowering pipeline: `simplify` (when enabled) then `hoist_if`
    pub fn from_config(config: &LowerConfig) -> Self {
        let mut pipeline = Self::new();
        if config.simplify {
            pipeline.add_pass(Box::new(SimplifyPass::new()));
        }
        pipeline.add_pass(Box::new(HoistIfPass::with_config(config.hoist_if.clone())));
        pipeline
    }

    pub fn add_pass(&mut self, pass: Box<dyn LoweringPass>) {
        self.passes.push(pass);
    }

    /// Builder form of [`PassPipeline::add_pass`]
    pub fn with_pass(mut self, pass: impl LoweringPass + 'static) -> Self {
        self.add_pass(Box::new(pass));
        self
    }

    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Validate `func`, then run every pass over it
    pub fn run(&mut self, mut func: PrimFunc) -> IrResult<(PrimFunc, PassReport)> {
        validate(&func)?;
        let mut report = PassReport {
            function: func.name.clone(),
            passes: Vec::with_capacity(self.passes.len()),
        };
        for pass in &mut self.passes {
            let changes = pass.run_on_function(&mut func)?;
            log::debug!("{}: {} change(s) in {}", pass.name(), changes, func.name);
            report.passes.push(PassRecord {
                name: pass.name().to_string(),
                changes,
            });
        }
        Ok((func, report))
    }
}

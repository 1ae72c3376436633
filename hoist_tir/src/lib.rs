// Library code reports through the `log` facade, never stderr.
#![deny(clippy::print_stderr)]

//! Loop-nest IR with interval bound analysis and hoisting of boundary
//! guards out of split loops.

// Core modules
pub mod arith;
pub mod config;
pub mod error;
pub mod ir;
pub mod rewrite;

// Passes and pipeline
pub mod transform;

// Rust API for programmatic use
pub mod api;
pub use api::{lower, lower_json, lower_json_with_config, lower_with_report};

pub use arith::{bound, evaluate_predicate, BoundAnalyzer, Interval, Truth};
pub use config::LowerConfig;
pub use error::{IrError, IrResult};
pub use ir::{BinOp, CmpOp, Expr, LogicOp, PrimFunc, Stmt, Var};
pub use transform::{hoist, ConditionHoister, HoistConfig, HoistStats, LoweringPass, PassPipeline};

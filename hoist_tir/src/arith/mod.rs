//! Integer range analysis.
//!
//! This module answers two questions about IR expressions given the ranges
//! of the variables they mention:
//! - what interval an integer expression always lies in ([`BoundAnalyzer::bound`])
//! - whether a predicate is always true, always false, or undetermined
//!   ([`BoundAnalyzer::evaluate`])
//!
//! # Supported operators
//!
//! Constants, variables, `+`, `-`, `*`, `floordiv`/`floormod` by positive
//! constants, `min`/`max`, comparisons and logical connectives. Anything else
//! (buffer loads, opaque calls, non-constant divisors) is unbounded, so every
//! predicate that depends on it evaluates to [`Truth::Unknown`].

mod bound;
mod interval;
mod linear;
mod monotonic;

pub use bound::{bound, evaluate_predicate, BoundAnalyzer, Truth};
pub use interval::Interval;
pub use linear::LinearForm;
pub use monotonic::{guard_shape, monotonicity, GuardShape, Monotonicity};

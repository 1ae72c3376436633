//! IR types.
//!
//! # Module Organization
//!
//! - `expr.rs`: Variables and expressions
//! - `stmt.rs`: Statement tree (loops, conditionals, sequences, stores) and `PrimFunc`
//! - `ops.rs`: Operator types + Display and constant evaluation
//! - `tests.rs`: Tests

mod expr;
mod ops;
mod stmt;

// Re-export all public types
pub use expr::{Expr, Var};
pub use ops::{floor_div, floor_mod, BinOp, CmpOp, LogicOp};
pub use stmt::{PrimFunc, Stmt};

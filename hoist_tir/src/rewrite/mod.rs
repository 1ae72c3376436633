//! Tree rewriting utilities
//!
//! Substitution, simplification and the constructors every transformation
//! uses to build new statements. Transformations go through [`make_for`],
//! [`make_if`] and [`make_seq`] rather than the raw [`Stmt`](crate::ir::Stmt)
//! constructors so that empty loops and branches never survive a rewrite.

mod build;
mod simplify;
mod substitute;

pub use build::{make_for, make_if, make_seq, validate};
pub use simplify::{simplify, simplify_stmt};
pub use substitute::{substitute_expr, substitute_stmt, substitute_var, SubstMap};

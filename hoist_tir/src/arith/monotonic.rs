//! Monotonicity of expressions in a single variable.
//!
//! Used to decide whether the set of iterations on which a guard holds is a
//! prefix or a suffix of the loop range. All results are non-strict: an
//! `Increasing` expression never decreases as the variable grows.

use super::bound::BoundAnalyzer;
use crate::ir::{BinOp, CmpOp, Expr, Var};

/// Direction in which an integer expression moves as a variable grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Monotonicity {
    /// Independent of the variable
    Constant,
    Increasing,
    Decreasing,
    Unknown,
}

impl Monotonicity {
    pub fn flip(self) -> Self {
        match self {
            Monotonicity::Increasing => Monotonicity::Decreasing,
            Monotonicity::Decreasing => Monotonicity::Increasing,
            other => other,
        }
    }

    /// Monotonicity of a sum, min or max of two operands
    pub fn combine(self, other: Monotonicity) -> Self {
        match (self, other) {
            (Monotonicity::Constant, m) | (m, Monotonicity::Constant) => m,
            (Monotonicity::Increasing, Monotonicity::Increasing) => Monotonicity::Increasing,
            (Monotonicity::Decreasing, Monotonicity::Decreasing) => Monotonicity::Decreasing,
            _ => Monotonicity::Unknown,
        }
    }
}

/// Monotonicity of `expr` in `var`.
///
/// Signs of loop-invariant factors are taken from the analyzer's ranges.
/// Anything that reads a buffer is `Unknown`, whether or not it mentions
/// `var`.
pub fn monotonicity(expr: &Expr, var: &Var, analyzer: &BoundAnalyzer) -> Monotonicity {
    if expr.reads_memory() {
        return Monotonicity::Unknown;
    }
    if !expr.uses_var(var) {
        return Monotonicity::Constant;
    }
    match expr {
        Expr::Var(_) => Monotonicity::Increasing,
        Expr::Binary { op, lhs, rhs } => {
            let l = monotonicity(lhs, var, analyzer);
            let r = monotonicity(rhs, var, analyzer);
            match op {
                BinOp::Add | BinOp::Min | BinOp::Max => l.combine(r),
                BinOp::Sub => l.combine(r.flip()),
                BinOp::Mul => match (l, r) {
                    (m, Monotonicity::Constant) => scale_by_sign(m, rhs, analyzer),
                    (Monotonicity::Constant, m) => scale_by_sign(m, lhs, analyzer),
                    _ => Monotonicity::Unknown,
                },
                BinOp::FloorDiv => match (r, analyzer.bound(rhs).as_point()) {
                    (Monotonicity::Constant, Some(d)) if d > 0 => l,
                    (Monotonicity::Constant, Some(d)) if d < 0 => l.flip(),
                    _ => Monotonicity::Unknown,
                },
                BinOp::FloorMod => Monotonicity::Unknown,
            }
        }
        _ => Monotonicity::Unknown,
    }
}

fn scale_by_sign(m: Monotonicity, factor: &Expr, analyzer: &BoundAnalyzer) -> Monotonicity {
    let range = analyzer.bound(factor);
    if range.lo.is_some_and(|lo| lo >= 0) {
        m
    } else if range.hi.is_some_and(|hi| hi <= 0) {
        m.flip()
    } else {
        Monotonicity::Unknown
    }
}

/// Shape of the set of loop iterations on which a guard holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardShape {
    /// The guard does not depend on the loop variable
    Invariant,
    /// True on a (possibly empty) leading run of iterations, false after
    Prefix,
    /// False on a leading run of iterations, true after
    Suffix,
    Unknown,
}

impl GuardShape {
    pub fn complement(self) -> Self {
        match self {
            GuardShape::Prefix => GuardShape::Suffix,
            GuardShape::Suffix => GuardShape::Prefix,
            other => other,
        }
    }

    /// Shape of a conjunction or disjunction of two guards
    pub fn merge(self, other: GuardShape) -> Self {
        match (self, other) {
            (GuardShape::Invariant, s) | (s, GuardShape::Invariant) => s,
            (GuardShape::Prefix, GuardShape::Prefix) => GuardShape::Prefix,
            (GuardShape::Suffix, GuardShape::Suffix) => GuardShape::Suffix,
            _ => GuardShape::Unknown,
        }
    }
}

/// Classify a guard as a prefix or suffix predicate of `var`
pub fn guard_shape(cond: &Expr, var: &Var, analyzer: &BoundAnalyzer) -> GuardShape {
    if cond.reads_memory() {
        return GuardShape::Unknown;
    }
    if !cond.uses_var(var) {
        return GuardShape::Invariant;
    }
    match cond {
        Expr::Cmp { op, lhs, rhs } => {
            let diff = Expr::binary(BinOp::Sub, lhs.as_ref().clone(), rhs.as_ref().clone());
            match (op, monotonicity(&diff, var, analyzer)) {
                (_, Monotonicity::Constant) => GuardShape::Invariant,
                (CmpOp::Lt | CmpOp::Le, Monotonicity::Increasing) => GuardShape::Prefix,
                (CmpOp::Lt | CmpOp::Le, Monotonicity::Decreasing) => GuardShape::Suffix,
                (CmpOp::Gt | CmpOp::Ge, Monotonicity::Increasing) => GuardShape::Suffix,
                (CmpOp::Gt | CmpOp::Ge, Monotonicity::Decreasing) => GuardShape::Prefix,
                _ => GuardShape::Unknown,
            }
        }
        Expr::Logic { lhs, rhs, .. } => {
            guard_shape(lhs, var, analyzer).merge(guard_shape(rhs, var, analyzer))
        }
        Expr::Not(operand) => guard_shape(operand, var, analyzer).complement(),
        _ => GuardShape::Unknown,
    }
}

//! Conservative bound analysis and predicate evaluation.

use super::interval::Interval;
use super::linear::LinearForm;
use crate::ir::{BinOp, CmpOp, Expr, LogicOp, Var};
use std::collections::HashMap;

/// Three-valued outcome of evaluating a predicate over a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Truth {
    AlwaysTrue,
    AlwaysFalse,
    Unknown,
}

impl Truth {
    pub fn from_bool(value: bool) -> Self {
        if value {
            Truth::AlwaysTrue
        } else {
            Truth::AlwaysFalse
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        match self {
            Truth::AlwaysTrue => Truth::AlwaysFalse,
            Truth::AlwaysFalse => Truth::AlwaysTrue,
            Truth::Unknown => Truth::Unknown,
        }
    }

    pub fn and(self, other: Truth) -> Self {
        match (self, other) {
            (Truth::AlwaysFalse, _) | (_, Truth::AlwaysFalse) => Truth::AlwaysFalse,
            (Truth::AlwaysTrue, Truth::AlwaysTrue) => Truth::AlwaysTrue,
            _ => Truth::Unknown,
        }
    }

    pub fn or(self, other: Truth) -> Self {
        match (self, other) {
            (Truth::AlwaysTrue, _) | (_, Truth::AlwaysTrue) => Truth::AlwaysTrue,
            (Truth::AlwaysFalse, Truth::AlwaysFalse) => Truth::AlwaysFalse,
            _ => Truth::Unknown,
        }
    }

    pub fn is_known(self) -> bool {
        self != Truth::Unknown
    }
}

/// Range environment plus assumed facts
///
/// Variables without a binding are unbounded. Facts are predicates known to
/// hold (or not hold) at the current program point; they are consulted by
/// structural equality before any range reasoning.
#[derive(Debug, Clone, Default)]
pub struct BoundAnalyzer {
    ranges: HashMap<Var, Interval>,
    facts: Vec<(Expr, bool)>,
}

impl BoundAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer over an existing range map
    pub fn with_ranges(ranges: HashMap<Var, Interval>) -> Self {
        Self {
            ranges,
            facts: Vec::new(),
        }
    }

    /// Bind a variable to a range, returning the previous binding.
    ///
    /// Pass the returned value to [`BoundAnalyzer::restore`] when leaving the scope.
    pub fn bind(&mut self, var: Var, range: Interval) -> Option<Interval> {
        self.ranges.insert(var, range)
    }

    /// Remove a binding, returning it
    pub fn unbind(&mut self, var: &Var) -> Option<Interval> {
        self.ranges.remove(var)
    }

    /// Restore a binding saved by [`BoundAnalyzer::bind`] or [`BoundAnalyzer::unbind`]
    pub fn restore(&mut self, var: Var, previous: Option<Interval>) {
        match previous {
            Some(range) => {
                self.ranges.insert(var, range);
            }
            None => {
                self.ranges.remove(&var);
            }
        }
    }

    pub fn range_of(&self, var: &Var) -> Interval {
        self.ranges.get(var).copied().unwrap_or(Interval::EVERYTHING)
    }

    /// Record that `condition` evaluates to `holds` from here on.
    ///
    /// Conditions that read a buffer are not recorded, since a store in the
    /// guarded region can change their value. Returns whether the fact was
    /// recorded; only then should it be paired with [`BoundAnalyzer::forget`].
    pub fn assume(&mut self, condition: Expr, holds: bool) -> bool {
        if condition.reads_memory() {
            return false;
        }
        self.facts.push((condition, holds));
        true
    }

    /// Drop the most recent assumption
    pub fn forget(&mut self) {
        self.facts.pop();
    }

    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    /// Drop every fact mentioning `var`, returning the full previous fact list.
    ///
    /// Used when entering a scope that rebinds `var`; hand the result to
    /// [`BoundAnalyzer::restore_facts`] on the way out.
    pub fn shadow_facts(&mut self, var: &Var) -> Vec<(Expr, bool)> {
        let saved = self.facts.clone();
        self.facts.retain(|(fact, _)| !fact.uses_var(var));
        saved
    }

    pub fn restore_facts(&mut self, saved: Vec<(Expr, bool)>) {
        self.facts = saved;
    }

    /// Conservative interval of an integer expression
    pub fn bound(&self, expr: &Expr) -> Interval {
        match LinearForm::from_expr(expr) {
            Some(form) => self.bound_linear(&form),
            None => Interval::EVERYTHING,
        }
    }

    fn bound_linear(&self, form: &LinearForm) -> Interval {
        let mut acc = Interval::point(form.constant);
        for (atom, coeff) in &form.terms {
            acc = acc.add(&self.bound_atom(atom).scale(*coeff));
            if acc.is_everything() {
                break;
            }
        }
        acc
    }

    fn bound_atom(&self, atom: &Expr) -> Interval {
        match atom {
            Expr::Var(var) => self.range_of(var),
            Expr::Binary { op, lhs, rhs } => {
                let l = self.bound(lhs);
                let r = self.bound(rhs);
                match op {
                    BinOp::Add => l.add(&r),
                    BinOp::Sub => l.sub(&r),
                    BinOp::Mul => l.mul(&r),
                    BinOp::FloorDiv => match r.as_point() {
                        Some(divisor) => l.floor_div(divisor),
                        None => Interval::EVERYTHING,
                    },
                    BinOp::FloorMod => match r.as_point() {
                        Some(divisor) => l.floor_mod(divisor),
                        None => Interval::EVERYTHING,
                    },
                    BinOp::Min => l.min(&r),
                    BinOp::Max => l.max(&r),
                }
            }
            Expr::Int(v) => Interval::point(*v),
            // Buffer contents and opaque calls carry no range information
            _ => Interval::EVERYTHING,
        }
    }

    /// Decide a predicate, consulting assumed facts first
    pub fn evaluate(&self, cond: &Expr) -> Truth {
        self.evaluate_impl(cond, true)
    }

    /// Decide a predicate from variable ranges alone
    pub fn evaluate_by_ranges(&self, cond: &Expr) -> Truth {
        self.evaluate_impl(cond, false)
    }

    /// Look a predicate up among the assumed facts
    pub fn lookup_fact(&self, cond: &Expr) -> Truth {
        for (fact, holds) in self.facts.iter().rev() {
            if fact == cond {
                return Truth::from_bool(*holds);
            }
            if let Expr::Not(inner) = cond {
                if fact == inner.as_ref() {
                    return Truth::from_bool(!*holds);
                }
            }
        }
        Truth::Unknown
    }

    /// Whether `cond` holds everywhere in the current ranges
    pub fn can_prove(&self, cond: &Expr) -> bool {
        self.evaluate(cond) == Truth::AlwaysTrue
    }

    fn evaluate_impl(&self, cond: &Expr, use_facts: bool) -> Truth {
        if use_facts {
            let from_fact = self.lookup_fact(cond);
            if from_fact.is_known() {
                return from_fact;
            }
        }
        match cond {
            Expr::Bool(b) => Truth::from_bool(*b),
            Expr::Cmp { op, lhs, rhs } => self.evaluate_cmp(*op, lhs, rhs),
            Expr::Logic { op, lhs, rhs } => {
                let l = self.evaluate_impl(lhs, use_facts);
                match (op, l) {
                    (LogicOp::And, Truth::AlwaysFalse) => Truth::AlwaysFalse,
                    (LogicOp::Or, Truth::AlwaysTrue) => Truth::AlwaysTrue,
                    (LogicOp::And, _) => l.and(self.evaluate_impl(rhs, use_facts)),
                    (LogicOp::Or, _) => l.or(self.evaluate_impl(rhs, use_facts)),
                }
            }
            Expr::Not(operand) => self.evaluate_impl(operand, use_facts).not(),
            _ => Truth::Unknown,
        }
    }

    fn evaluate_cmp(&self, op: CmpOp, lhs: &Expr, rhs: &Expr) -> Truth {
        let diff = match (LinearForm::from_expr(lhs), LinearForm::from_expr(rhs)) {
            (Some(l), Some(r)) => r.scale(-1).and_then(|neg| l.add(&neg)),
            _ => None,
        };
        match diff {
            Some(form) => decide(op, &self.bound_linear(&form)),
            None => Truth::Unknown,
        }
    }
}

/// Decide `diff op 0` for `diff` in the given interval
fn decide(op: CmpOp, diff: &Interval) -> Truth {
    let below = |t: i64| diff.hi.is_some_and(|hi| hi < t);
    let above = |t: i64| diff.lo.is_some_and(|lo| lo > t);
    match op {
        CmpOp::Lt if below(0) => Truth::AlwaysTrue,
        CmpOp::Lt if above(-1) => Truth::AlwaysFalse,
        CmpOp::Le if below(1) => Truth::AlwaysTrue,
        CmpOp::Le if above(0) => Truth::AlwaysFalse,
        CmpOp::Gt if above(0) => Truth::AlwaysTrue,
        CmpOp::Gt if below(1) => Truth::AlwaysFalse,
        CmpOp::Ge if above(-1) => Truth::AlwaysTrue,
        CmpOp::Ge if below(0) => Truth::AlwaysFalse,
        CmpOp::Eq | CmpOp::Ne => {
            let eq = if diff.as_point() == Some(0) {
                Truth::AlwaysTrue
            } else if above(0) || below(0) {
                Truth::AlwaysFalse
            } else {
                Truth::Unknown
            };
            if op == CmpOp::Eq {
                eq
            } else {
                eq.not()
            }
        }
        _ => Truth::Unknown,
    }
}

/// Conservative interval of `expr` given a range map
pub fn bound(expr: &Expr, ranges: &HashMap<Var, Interval>) -> Interval {
    BoundAnalyzer::with_ranges(ranges.clone()).bound(expr)
}

/// Decide `cond` over every binding consistent with `ranges`
pub fn evaluate_predicate(cond: &Expr, ranges: &HashMap<Var, Interval>) -> Truth {
    BoundAnalyzer::with_ranges(ranges.clone()).evaluate(cond)
}

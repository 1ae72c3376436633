//! Hoisting of loop-variant guards out of split loops
//!
//! Splitting a loop of extent `N` by a factor that does not divide `N`
//! leaves a boundary check `outer * factor + inner < N` in the innermost
//! body. This pass removes that check from the iterations where it
//! provably holds.
//!
//! For a loop whose body is a single conditional on the loop variable:
//! - guard true on every iteration: the conditional is dropped
//! - guard decidable once per loop entry: the loop is versioned into a
//!   guard-free copy and a guarded copy, selected by the relaxed guard
//! - guard true on a leading run of a constant-extent loop: the loop is
//!   split into a guard-free prefix and a guarded remainder
//!
//! Anything the bound analysis cannot decide is left untouched.

use crate::arith::{guard_shape, BoundAnalyzer, GuardShape, Interval, Truth};
use crate::error::IrResult;
use crate::ir::{Expr, Stmt, Var};
use crate::rewrite::{make_for, make_if, make_seq, simplify, substitute_var};
use serde::{Deserialize, Serialize};

/// Configuration for guard hoisting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoistConfig {
    /// Run the pass at all
    pub enabled: bool,
    /// Allow loop versioning on guards only decidable at run time
    pub versioning: bool,
    /// Allow splitting constant-extent loops at the guard boundary
    pub prefix_split: bool,
    /// Maximum number of whole-tree passes before giving up on a fixpoint
    pub max_iterations: usize,
}

impl Default for HoistConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            versioning: true,
            prefix_split: true,
            max_iterations: 16,
        }
    }
}

/// Rewrite counters accumulated over all calls to [`ConditionHoister::hoist`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HoistStats {
    /// Guards removed from a whole loop
    pub eliminated: usize,
    /// Loops duplicated into guard-free and guarded copies
    pub versioned: usize,
    /// Loops split into a guard-free prefix and a guarded remainder
    pub split: usize,
    /// Whole-tree passes run
    pub iterations: usize,
}

impl HoistStats {
    /// Total number of rewrites
    pub fn rewrites(&self) -> usize {
        self.eliminated + self.versioned + self.split
    }
}

/// Decision for one candidate loop
#[derive(Debug)]
enum Plan {
    Keep(&'static str),
    Eliminate,
    Version(Expr),
    Split { at: i64, extent: i64 },
}

/// Guard hoister over statement trees
#[derive(Debug)]
pub struct ConditionHoister {
    /// Configuration
    pub config: HoistConfig,
    analyzer: BoundAnalyzer,
    stats: HoistStats,
}

impl ConditionHoister {
    /// Create a hoister with default config
    pub fn new() -> Self {
        Self::with_config(HoistConfig::default())
    }

    /// Create a hoister with custom config
    pub fn with_config(config: HoistConfig) -> Self {
        Self {
            config,
            analyzer: BoundAnalyzer::new(),
            stats: HoistStats::default(),
        }
    }

    pub fn stats(&self) -> &HoistStats {
        &self.stats
    }

    /// Get eliminated count
    pub fn eliminated_count(&self) -> usize {
        self.stats.eliminated
    }

    /// Get versioned count
    pub fn versioned_count(&self) -> usize {
        self.stats.versioned
    }

    /// Get split count
    pub fn split_count(&self) -> usize {
        self.stats.split
    }

    /// Rewrite `stmt` until no more guards can be hoisted.
    ///
    /// Free variables of `stmt` are treated as unbounded.
    pub fn hoist(&mut self, stmt: Stmt) -> Stmt {
        if !self.config.enabled {
            log::trace!("hoist_if: disabled");
            return stmt;
        }
        let mut current = stmt;
        for _ in 0..self.config.max_iterations {
            self.stats.iterations += 1;
            let before = self.stats.rewrites();
            current = self.visit(current);
            if self.stats.rewrites() == before {
                return current;
            }
        }
        log::warn!(
            "hoist_if: no fixpoint after {} iterations, returning the last tree",
            self.config.max_iterations
        );
        current
    }

    fn visit(&mut self, stmt: Stmt) -> Stmt {
        match stmt {
            Stmt::For {
                var,
                min,
                extent,
                body,
            } => {
                if self.analyzer.bound(&extent).hi.is_some_and(|hi| hi <= 0) {
                    // Never runs
                    return Stmt::For {
                        var,
                        min,
                        extent,
                        body,
                    };
                }
                let range = self.loop_range(&min, &extent);
                let saved_facts = self.analyzer.shadow_facts(&var);
                let previous = self.analyzer.bind(var.clone(), range);
                let body = self.visit(*body);
                self.analyzer.restore(var.clone(), previous);
                self.analyzer.restore_facts(saved_facts);
                self.rewrite_loop(var, min, extent, body)
            }
            Stmt::IfThenElse {
                condition,
                then_case,
                else_case,
            } => {
                let then_case = self.visit_assuming(&condition, true, *then_case);
                let else_case = else_case.map(|e| Box::new(self.visit_assuming(&condition, false, *e)));
                Stmt::IfThenElse {
                    condition,
                    then_case: Box::new(then_case),
                    else_case,
                }
            }
            Stmt::Seq(stmts) => Stmt::Seq(stmts.into_iter().map(|s| self.visit(s)).collect()),
            other => other,
        }
    }

    fn visit_assuming(&mut self, condition: &Expr, holds: bool, stmt: Stmt) -> Stmt {
        let recorded = self.analyzer.assume(condition.clone(), holds);
        let stmt = self.visit(stmt);
        if recorded {
            self.analyzer.forget();
        }
        stmt
    }

    /// Range of a loop variable over `[min, min + extent)`
    fn loop_range(&self, min: &Expr, extent: &Expr) -> Interval {
        let last = min.clone() + extent.clone() - Expr::int(1);
        let range = Interval {
            lo: self.analyzer.bound(min).lo,
            hi: self.analyzer.bound(&last).hi,
        };
        match (range.lo, range.hi) {
            // The loop never runs; claim nothing
            (Some(lo), Some(hi)) if lo > hi => Interval::EVERYTHING,
            _ => range,
        }
    }

    fn rewrite_loop(&mut self, var: Var, min: Expr, extent: Expr, body: Stmt) -> Stmt {
        let rewritten = match &body {
            Stmt::IfThenElse {
                condition,
                then_case,
                ..
            } => match self.plan(&var, &min, &extent, condition) {
                Plan::Keep(reason) => {
                    log::trace!("hoist_if: keeping guard {} in loop over {}: {}", condition, var, reason);
                    None
                }
                plan => match self.apply(plan, &var, &min, &extent, then_case, &body) {
                    Ok(stmt) => Some(stmt),
                    Err(err) => {
                        log::trace!("hoist_if: rewrite of loop over {} abandoned: {}", var, err);
                        None
                    }
                },
            },
            _ => None,
        };
        rewritten.unwrap_or_else(|| Stmt::for_range(var, min, extent, body))
    }

    fn plan(&mut self, var: &Var, min: &Expr, extent: &Expr, cond: &Expr) -> Plan {
        if !cond.uses_var(var) {
            return Plan::Keep("guard is loop invariant");
        }
        if min.uses_var(var) || extent.uses_var(var) {
            return Plan::Keep("loop bounds mention the loop variable");
        }
        let offset_range = match self.analyzer.bound(extent).hi {
            Some(hi) if hi <= 0 => return Plan::Keep("loop is empty"),
            hi => Interval {
                lo: Some(0),
                hi: hi.map(|h| h - 1),
            },
        };

        // Analyze with the loop rebased to start at zero
        let cond_off = simplify(&substitute_var(cond, var, &(min.clone() + Expr::from(var))));
        let previous = self.analyzer.bind(var.clone(), offset_range);
        let truth = self.analyzer.evaluate_by_ranges(&cond_off);
        let shape = guard_shape(&cond_off, var, &self.analyzer);
        self.analyzer.restore(var.clone(), previous);

        match truth {
            Truth::AlwaysTrue => return Plan::Eliminate,
            Truth::AlwaysFalse => return Plan::Keep("guard never holds"),
            Truth::Unknown => {}
        }

        let worst = match shape {
            GuardShape::Prefix => simplify(&(min.clone() + extent.clone() - Expr::int(1))),
            GuardShape::Suffix => min.clone(),
            GuardShape::Invariant | GuardShape::Unknown => {
                return Plan::Keep("guard is not monotone in the loop variable")
            }
        };
        let relaxed = simplify(&substitute_var(cond, var, &worst));
        match self.analyzer.evaluate_by_ranges(&relaxed) {
            Truth::AlwaysTrue => return Plan::Eliminate,
            Truth::AlwaysFalse => {}
            Truth::Unknown => match self.analyzer.lookup_fact(&relaxed) {
                Truth::AlwaysTrue => return Plan::Eliminate,
                Truth::AlwaysFalse => return Plan::Keep("loop is the guarded copy of a versioned pair"),
                Truth::Unknown if self.config.versioning => return Plan::Version(relaxed),
                Truth::Unknown => {}
            },
        }

        if shape != GuardShape::Prefix || !self.config.prefix_split {
            return Plan::Keep("no provable prefix");
        }
        let Some(ext) = simplify(extent).as_int() else {
            return Plan::Keep("extent is not constant");
        };
        match self.longest_true_prefix(var, &cond_off, ext) {
            0 => Plan::Keep("guard is not provable on any prefix"),
            k if k >= ext => Plan::Eliminate,
            k => Plan::Split { at: k, extent: ext },
        }
    }

    /// Largest `k <= extent` such that `cond_off` provably holds for
    /// `var` in `[0, k)`
    fn longest_true_prefix(&mut self, var: &Var, cond_off: &Expr, extent: i64) -> i64 {
        let (mut lo, mut hi) = (0, extent);
        while lo < hi {
            let mid = lo + (hi - lo + 1) / 2;
            let previous = self.analyzer.bind(var.clone(), Interval::new(0, mid - 1));
            let proven = self.analyzer.evaluate_by_ranges(cond_off) == Truth::AlwaysTrue;
            self.analyzer.restore(var.clone(), previous);
            if proven {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        lo
    }

    fn apply(
        &mut self,
        plan: Plan,
        var: &Var,
        min: &Expr,
        extent: &Expr,
        then_case: &Stmt,
        guarded: &Stmt,
    ) -> IrResult<Stmt> {
        match plan {
            Plan::Keep(_) => Ok(Stmt::for_range(
                var.clone(),
                min.clone(),
                extent.clone(),
                guarded.clone(),
            )),
            Plan::Eliminate => {
                let stmt = make_for(var.clone(), min.clone(), extent.clone(), then_case.clone())?;
                log::debug!("hoist_if: eliminated guard in loop over {}", var);
                self.stats.eliminated += 1;
                Ok(stmt)
            }
            Plan::Version(relaxed) => {
                let fast = make_for(var.clone(), min.clone(), extent.clone(), then_case.clone())?;
                let slow = Stmt::for_range(var.clone(), min.clone(), extent.clone(), guarded.clone());
                log::debug!("hoist_if: versioned loop over {} on {}", var, relaxed);
                self.stats.versioned += 1;
                Ok(make_if(relaxed, fast, Some(slow)))
            }
            Plan::Split { at, extent } => {
                let head = make_for(var.clone(), min.clone(), Expr::int(at), then_case.clone())?;
                let tail = make_for(
                    var.clone(),
                    simplify(&(min.clone() + Expr::int(at))),
                    Expr::int(extent - at),
                    guarded.clone(),
                )?;
                log::debug!("hoist_if: split loop over {} at {} of {}", var, at, extent);
                self.stats.split += 1;
                Ok(make_seq(vec![head, tail]))
            }
        }
    }
}

impl Default for ConditionHoister {
    fn default() -> Self {
        Self::new()
    }
}

/// Hoist guards out of `stmt` with the default configuration
pub fn hoist(stmt: Stmt) -> Stmt {
    ConditionHoister::new().hoist(stmt)
}

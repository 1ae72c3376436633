//! Linear (affine) normal form of integer expressions.
//!
//! An expression is decomposed into `c0 + sum(ci * atom_i)` where each atom is
//! either a variable or a non-affine sub-expression (products of two
//! non-constant terms, floor division, modulo, min/max, loads, calls).
//! Collecting terms this way lets the bound analysis cancel repeated
//! occurrences of the same atom, which plain interval arithmetic cannot do.

use crate::ir::{BinOp, Expr};
use std::collections::BTreeMap;

/// `constant + sum(coeff * atom)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearForm {
    pub terms: BTreeMap<Expr, i64>,
    pub constant: i64,
}

impl LinearForm {
    pub fn constant(value: i64) -> Self {
        Self {
            terms: BTreeMap::new(),
            constant: value,
        }
    }

    fn atom(expr: Expr) -> Self {
        let mut terms = BTreeMap::new();
        terms.insert(expr, 1);
        Self { terms, constant: 0 }
    }

    /// Decompose an integer expression.
    ///
    /// Returns `None` for boolean expressions and when a coefficient overflows.
    pub fn from_expr(expr: &Expr) -> Option<Self> {
        match expr {
            Expr::Int(v) => Some(Self::constant(*v)),
            Expr::Var(_) | Expr::Load { .. } | Expr::Call { .. } => Some(Self::atom(expr.clone())),
            Expr::Binary { op, lhs, rhs } => match op {
                BinOp::Add => Self::from_expr(lhs)?.add(&Self::from_expr(rhs)?),
                BinOp::Sub => Self::from_expr(lhs)?.add(&Self::from_expr(rhs)?.scale(-1)?),
                BinOp::Mul => {
                    let l = Self::from_expr(lhs)?;
                    let r = Self::from_expr(rhs)?;
                    if let Some(c) = r.as_constant() {
                        l.scale(c)
                    } else if let Some(c) = l.as_constant() {
                        r.scale(c)
                    } else {
                        Some(Self::atom(expr.clone()))
                    }
                }
                BinOp::FloorDiv | BinOp::FloorMod | BinOp::Min | BinOp::Max => {
                    Some(Self::atom(expr.clone()))
                }
            },
            Expr::Bool(_) | Expr::Cmp { .. } | Expr::Logic { .. } | Expr::Not(_) => None,
        }
    }

    pub fn as_constant(&self) -> Option<i64> {
        if self.terms.is_empty() {
            Some(self.constant)
        } else {
            None
        }
    }

    pub fn add(mut self, other: &LinearForm) -> Option<Self> {
        self.constant = self.constant.checked_add(other.constant)?;
        for (atom, coeff) in &other.terms {
            let entry = self.terms.entry(atom.clone()).or_insert(0);
            *entry = entry.checked_add(*coeff)?;
        }
        self.terms.retain(|_, c| *c != 0);
        Some(self)
    }

    pub fn scale(mut self, factor: i64) -> Option<Self> {
        if factor == 0 {
            return Some(Self::constant(0));
        }
        self.constant = self.constant.checked_mul(factor)?;
        for coeff in self.terms.values_mut() {
            *coeff = coeff.checked_mul(factor)?;
        }
        Some(self)
    }

    /// Coefficient of an atom, 0 when absent
    pub fn coefficient(&self, atom: &Expr) -> i64 {
        self.terms.get(atom).copied().unwrap_or(0)
    }
}

//! Expression and variable types.
//!
//! Expressions are immutable, side-effect free trees over integer and
//! boolean operators. Buffer loads are reads only; the analyses treat them
//! as opaque values that may change whenever the loop body stores.

use super::ops::{BinOp, CmpOp, LogicOp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A named integer variable (loop induction variable or scalar parameter)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Var(String);

impl Var {
    pub fn new(name: impl Into<String>) -> Self {
        Var(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// IR expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Expr {
    /// Integer literal
    Int(i64),
    /// Boolean literal
    Bool(bool),
    /// Variable reference
    Var(Var),
    /// Integer arithmetic
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Integer comparison, boolean result
    Cmp {
        op: CmpOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Logical connective
    Logic {
        op: LogicOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Logical negation
    Not(Box<Expr>),
    /// Read of `buffer[index]`
    Load { buffer: String, index: Box<Expr> },
    /// Opaque pure call
    Call { name: String, args: Vec<Expr> },
}

impl Expr {
    pub fn int(value: i64) -> Self {
        Expr::Int(value)
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(Var::new(name))
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn cmp(op: CmpOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Cmp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn logic(op: LogicOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Logic {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn floordiv(lhs: Expr, rhs: Expr) -> Self {
        Expr::binary(BinOp::FloorDiv, lhs, rhs)
    }

    pub fn floormod(lhs: Expr, rhs: Expr) -> Self {
        Expr::binary(BinOp::FloorMod, lhs, rhs)
    }

    pub fn min(lhs: Expr, rhs: Expr) -> Self {
        Expr::binary(BinOp::Min, lhs, rhs)
    }

    pub fn max(lhs: Expr, rhs: Expr) -> Self {
        Expr::binary(BinOp::Max, lhs, rhs)
    }

    pub fn lt(lhs: Expr, rhs: Expr) -> Self {
        Expr::cmp(CmpOp::Lt, lhs, rhs)
    }

    pub fn le(lhs: Expr, rhs: Expr) -> Self {
        Expr::cmp(CmpOp::Le, lhs, rhs)
    }

    pub fn gt(lhs: Expr, rhs: Expr) -> Self {
        Expr::cmp(CmpOp::Gt, lhs, rhs)
    }

    pub fn ge(lhs: Expr, rhs: Expr) -> Self {
        Expr::cmp(CmpOp::Ge, lhs, rhs)
    }

    pub fn eq(lhs: Expr, rhs: Expr) -> Self {
        Expr::cmp(CmpOp::Eq, lhs, rhs)
    }

    pub fn ne(lhs: Expr, rhs: Expr) -> Self {
        Expr::cmp(CmpOp::Ne, lhs, rhs)
    }

    pub fn and(lhs: Expr, rhs: Expr) -> Self {
        Expr::logic(LogicOp::And, lhs, rhs)
    }

    pub fn or(lhs: Expr, rhs: Expr) -> Self {
        Expr::logic(LogicOp::Or, lhs, rhs)
    }

    pub fn not(operand: Expr) -> Self {
        Expr::Not(Box::new(operand))
    }

    pub fn load(buffer: impl Into<String>, index: Expr) -> Self {
        Expr::Load {
            buffer: buffer.into(),
            index: Box::new(index),
        }
    }

    /// Call of a pure integer function, opaque to the analysis
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            name: name.into(),
            args,
        }
    }

    /// Integer value if this is a literal
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Expr::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean value if this is a literal
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Expr::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether the expression produces a boolean
    pub fn is_boolean(&self) -> bool {
        matches!(
            self,
            Expr::Bool(_) | Expr::Cmp { .. } | Expr::Logic { .. } | Expr::Not(_)
        )
    }

    /// Whether `var` occurs anywhere in the expression
    pub fn uses_var(&self, var: &Var) -> bool {
        match self {
            Expr::Int(_) | Expr::Bool(_) => false,
            Expr::Var(v) => v == var,
            Expr::Binary { lhs, rhs, .. }
            | Expr::Cmp { lhs, rhs, .. }
            | Expr::Logic { lhs, rhs, .. } => lhs.uses_var(var) || rhs.uses_var(var),
            Expr::Not(operand) => operand.uses_var(var),
            Expr::Load { index, .. } => index.uses_var(var),
            Expr::Call { args, .. } => args.iter().any(|a| a.uses_var(var)),
        }
    }

    /// Whether the expression reads any buffer.
    ///
    /// A load may observe stores made between two evaluations, so its value
    /// is never loop invariant.
    pub fn reads_memory(&self) -> bool {
        match self {
            Expr::Int(_) | Expr::Bool(_) | Expr::Var(_) => false,
            Expr::Binary { lhs, rhs, .. }
            | Expr::Cmp { lhs, rhs, .. }
            | Expr::Logic { lhs, rhs, .. } => lhs.reads_memory() || rhs.reads_memory(),
            Expr::Not(operand) => operand.reads_memory(),
            Expr::Load { .. } => true,
            Expr::Call { args, .. } => args.iter().any(Expr::reads_memory),
        }
    }

    /// Collect every variable referenced by the expression
    pub fn free_vars(&self) -> BTreeSet<Var> {
        let mut vars = BTreeSet::new();
        self.collect_vars(&mut vars);
        vars
    }

    pub(crate) fn collect_vars(&self, out: &mut BTreeSet<Var>) {
        match self {
            Expr::Int(_) | Expr::Bool(_) => {}
            Expr::Var(v) => {
                out.insert(v.clone());
            }
            Expr::Binary { lhs, rhs, .. }
            | Expr::Cmp { lhs, rhs, .. }
            | Expr::Logic { lhs, rhs, .. } => {
                lhs.collect_vars(out);
                rhs.collect_vars(out);
            }
            Expr::Not(operand) => operand.collect_vars(out),
            Expr::Load { index, .. } => index.collect_vars(out),
            Expr::Call { args, .. } => {
                for arg in args {
                    arg.collect_vars(out);
                }
            }
        }
    }

    /// Number of nodes in the expression tree
    pub fn size(&self) -> usize {
        1 + match self {
            Expr::Int(_) | Expr::Bool(_) | Expr::Var(_) => 0,
            Expr::Binary { lhs, rhs, .. }
            | Expr::Cmp { lhs, rhs, .. }
            | Expr::Logic { lhs, rhs, .. } => lhs.size() + rhs.size(),
            Expr::Not(operand) => operand.size(),
            Expr::Load { index, .. } => index.size(),
            Expr::Call { args, .. } => args.iter().map(Expr::size).sum(),
        }
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Int(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::Bool(value)
    }
}

impl From<Var> for Expr {
    fn from(var: Var) -> Self {
        Expr::Var(var)
    }
}

impl From<&Var> for Expr {
    fn from(var: &Var) -> Self {
        Expr::Var(var.clone())
    }
}

impl std::ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::binary(BinOp::Add, self, rhs)
    }
}

impl std::ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::binary(BinOp::Sub, self, rhs)
    }
}

impl std::ops::Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::binary(BinOp::Mul, self, rhs)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Int(v) => write!(f, "{}", v),
            Expr::Bool(b) => write!(f, "{}", b),
            Expr::Var(v) => write!(f, "{}", v),
            Expr::Binary { op, lhs, rhs } if op.is_call_like() => {
                write!(f, "{}({}, {})", op, lhs, rhs)
            }
            Expr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op, rhs),
            Expr::Cmp { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op, rhs),
            Expr::Logic { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op, rhs),
            Expr::Not(operand) => write!(f, "!{}", operand),
            Expr::Load { buffer, index } => write!(f, "{}[{}]", buffer, index),
            Expr::Call { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

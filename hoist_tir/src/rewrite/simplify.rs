//! Expression and statement simplification.
//!
//! Constant folding, trivial identity elimination (`x + 0`, `x * 1`,
//! `floordiv(x, 1)`, ...) and re-association of constant addends and
//! factors. The result is structurally deterministic, so simplifying two
//! equal expressions yields equal expressions.

use super::build::{make_for, make_if, make_seq};
use crate::arith::LinearForm;
use crate::error::IrResult;
use crate::ir::{BinOp, CmpOp, Expr, LogicOp, Stmt};

/// Simplify an expression
pub fn simplify(expr: &Expr) -> Expr {
    match expr {
        Expr::Int(_) | Expr::Bool(_) | Expr::Var(_) => expr.clone(),
        Expr::Binary { op, lhs, rhs } => simplify_binary(*op, simplify(lhs), simplify(rhs)),
        Expr::Cmp { op, lhs, rhs } => simplify_cmp(*op, simplify(lhs), simplify(rhs)),
        Expr::Logic { op, lhs, rhs } => simplify_logic(*op, simplify(lhs), simplify(rhs)),
        Expr::Not(operand) => match simplify(operand) {
            Expr::Bool(b) => Expr::Bool(!b),
            Expr::Not(inner) => *inner,
            Expr::Cmp { op, lhs, rhs } => Expr::Cmp {
                op: op.negate(),
                lhs,
                rhs,
            },
            other => Expr::not(other),
        },
        Expr::Load { buffer, index } => Expr::load(buffer.clone(), simplify(index)),
        Expr::Call { name, args } => Expr::Call {
            name: name.clone(),
            args: args.iter().map(simplify).collect(),
        },
    }
}

fn simplify_binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    if let (Some(a), Some(b)) = (lhs.as_int(), rhs.as_int()) {
        if let Some(v) = op.eval(a, b) {
            return Expr::Int(v);
        }
        return Expr::binary(op, lhs, rhs);
    }
    match op {
        BinOp::Add => simplify_add(lhs, rhs),
        BinOp::Sub => {
            if rhs.as_int() == Some(0) {
                lhs
            } else if lhs == rhs {
                Expr::Int(0)
            } else if let Some(c) = rhs.as_int().and_then(i64::checked_neg) {
                // x - c folds into the constant addend of x
                match &lhs {
                    Expr::Binary {
                        op: BinOp::Add,
                        rhs: inner,
                        ..
                    } if inner.as_int().is_some() => simplify_add(lhs, Expr::Int(c)),
                    _ => Expr::binary(BinOp::Sub, lhs, rhs),
                }
            } else {
                Expr::binary(BinOp::Sub, lhs, rhs)
            }
        }
        BinOp::Mul => simplify_mul(lhs, rhs),
        BinOp::FloorDiv => match rhs.as_int() {
            Some(1) => lhs,
            _ if lhs.as_int() == Some(0) && rhs.as_int().is_some_and(|d| d != 0) => Expr::Int(0),
            _ => Expr::binary(op, lhs, rhs),
        },
        BinOp::FloorMod => match rhs.as_int() {
            Some(1) | Some(-1) => Expr::Int(0),
            _ => Expr::binary(op, lhs, rhs),
        },
        BinOp::Min | BinOp::Max => {
            if lhs == rhs {
                lhs
            } else {
                Expr::binary(op, lhs, rhs)
            }
        }
    }
}

/// Addition with the constant kept as the right operand
fn simplify_add(lhs: Expr, rhs: Expr) -> Expr {
    // Constant on the right
    let (lhs, rhs) = if lhs.as_int().is_some() {
        (rhs, lhs)
    } else {
        (lhs, rhs)
    };
    let Some(c) = rhs.as_int() else {
        return Expr::binary(BinOp::Add, lhs, rhs);
    };
    if c == 0 {
        return lhs;
    }
    // (x + c1) + c2 => x + (c1 + c2)
    if let Expr::Binary {
        op: BinOp::Add,
        lhs: inner_lhs,
        rhs: inner_rhs,
    } = &lhs
    {
        if let Some(sum) = inner_rhs.as_int().and_then(|c1| c1.checked_add(c)) {
            let base = inner_lhs.as_ref().clone();
            return if sum == 0 {
                base
            } else {
                Expr::binary(BinOp::Add, base, Expr::Int(sum))
            };
        }
    }
    Expr::binary(BinOp::Add, lhs, rhs)
}

/// Multiplication with the constant kept as the right operand
fn simplify_mul(lhs: Expr, rhs: Expr) -> Expr {
    let (lhs, rhs) = if lhs.as_int().is_some() {
        (rhs, lhs)
    } else {
        (lhs, rhs)
    };
    match rhs.as_int() {
        Some(0) => Expr::Int(0),
        Some(1) => lhs,
        Some(c) => {
            // (x * c1) * c2 => x * (c1 * c2)
            if let Expr::Binary {
                op: BinOp::Mul,
                lhs: inner_lhs,
                rhs: inner_rhs,
            } = &lhs
            {
                if let Some(product) = inner_rhs.as_int().and_then(|c1| c1.checked_mul(c)) {
                    return Expr::binary(BinOp::Mul, inner_lhs.as_ref().clone(), Expr::Int(product));
                }
            }
            Expr::binary(BinOp::Mul, lhs, rhs)
        }
        None => Expr::binary(BinOp::Mul, lhs, rhs),
    }
}

fn simplify_cmp(op: CmpOp, lhs: Expr, rhs: Expr) -> Expr {
    if let (Some(a), Some(b)) = (lhs.as_int(), rhs.as_int()) {
        return Expr::Bool(op.eval(a, b));
    }
    // Both sides differ by a constant: decide outright
    if let (Some(l), Some(r)) = (LinearForm::from_expr(&lhs), LinearForm::from_expr(&rhs)) {
        let diff = r.scale(-1).and_then(|neg| l.add(&neg));
        if let Some(c) = diff.and_then(|d| d.as_constant()) {
            return Expr::Bool(op.eval(c, 0));
        }
    }
    Expr::cmp(op, lhs, rhs)
}

fn simplify_logic(op: LogicOp, lhs: Expr, rhs: Expr) -> Expr {
    match (op, lhs.as_bool(), rhs.as_bool()) {
        (_, Some(a), Some(b)) => Expr::Bool(op.eval(a, b)),
        (LogicOp::And, Some(false), _) | (LogicOp::And, _, Some(false)) => Expr::Bool(false),
        (LogicOp::Or, Some(true), _) | (LogicOp::Or, _, Some(true)) => Expr::Bool(true),
        (LogicOp::And, Some(true), _) | (LogicOp::Or, Some(false), _) => rhs,
        (LogicOp::And, _, Some(true)) | (LogicOp::Or, _, Some(false)) => lhs,
        _ => {
            if lhs == rhs {
                lhs
            } else {
                Expr::logic(op, lhs, rhs)
            }
        }
    }
}

/// Simplify every expression in a statement tree.
///
/// Conditionals with a constant condition are replaced by the taken branch,
/// and empty loops and statements collapse to no-ops.
pub fn simplify_stmt(stmt: &Stmt) -> IrResult<Stmt> {
    match stmt {
        Stmt::For {
            var,
            min,
            extent,
            body,
        } => make_for(var.clone(), simplify(min), simplify(extent), simplify_stmt(body)?),
        Stmt::IfThenElse {
            condition,
            then_case,
            else_case,
        } => {
            let condition = simplify(condition);
            let then_case = simplify_stmt(then_case)?;
            let else_case = match else_case {
                Some(e) => Some(simplify_stmt(e)?),
                None => None,
            };
            Ok(match condition.as_bool() {
                Some(true) => then_case,
                Some(false) => else_case.unwrap_or(Stmt::NoOp),
                None => make_if(condition, then_case, else_case),
            })
        }
        Stmt::Seq(stmts) => {
            let stmts = stmts.iter().map(simplify_stmt).collect::<IrResult<Vec<_>>>()?;
            Ok(make_seq(stmts))
        }
        Stmt::Store {
            buffer,
            index,
            value,
        } => Ok(Stmt::Store {
            buffer: buffer.clone(),
            index: simplify(index),
            value: simplify(value),
        }),
        Stmt::NoOp => Ok(Stmt::NoOp),
    }
}

//! Structural substitution of variables.

use crate::ir::{Expr, Stmt, Var};
use std::collections::HashMap;

/// Variable-to-expression map applied simultaneously
pub type SubstMap = HashMap<Var, Expr>;

/// Replace every occurrence of a mapped variable in `expr`
pub fn substitute_expr(expr: &Expr, map: &SubstMap) -> Expr {
    if map.is_empty() {
        return expr.clone();
    }
    match expr {
        Expr::Var(v) => match map.get(v) {
            Some(replacement) => replacement.clone(),
            None => expr.clone(),
        },
        Expr::Int(_) | Expr::Bool(_) => expr.clone(),
        Expr::Binary { op, lhs, rhs } => {
            Expr::binary(*op, substitute_expr(lhs, map), substitute_expr(rhs, map))
        }
        Expr::Cmp { op, lhs, rhs } => {
            Expr::cmp(*op, substitute_expr(lhs, map), substitute_expr(rhs, map))
        }
        Expr::Logic { op, lhs, rhs } => {
            Expr::logic(*op, substitute_expr(lhs, map), substitute_expr(rhs, map))
        }
        Expr::Not(operand) => Expr::not(substitute_expr(operand, map)),
        Expr::Load { buffer, index } => Expr::load(buffer.clone(), substitute_expr(index, map)),
        Expr::Call { name, args } => Expr::Call {
            name: name.clone(),
            args: args.iter().map(|a| substitute_expr(a, map)).collect(),
        },
    }
}

/// Substitute a single variable
pub fn substitute_var(expr: &Expr, var: &Var, replacement: &Expr) -> Expr {
    let mut map = SubstMap::new();
    map.insert(var.clone(), replacement.clone());
    substitute_expr(expr, &map)
}

/// Replace mapped variables throughout a statement.
///
/// A loop that rebinds a mapped variable shadows it: the loop bounds are
/// still substituted, its body is not.
pub fn substitute_stmt(stmt: &Stmt, map: &SubstMap) -> Stmt {
    if map.is_empty() {
        return stmt.clone();
    }
    match stmt {
        Stmt::For {
            var,
            min,
            extent,
            body,
        } => {
            let min = substitute_expr(min, map);
            let extent = substitute_expr(extent, map);
            let body = if map.contains_key(var) {
                let mut inner = map.clone();
                inner.remove(var);
                substitute_stmt(body, &inner)
            } else {
                substitute_stmt(body, map)
            };
            Stmt::for_range(var.clone(), min, extent, body)
        }
        Stmt::IfThenElse {
            condition,
            then_case,
            else_case,
        } => Stmt::IfThenElse {
            condition: substitute_expr(condition, map),
            then_case: Box::new(substitute_stmt(then_case, map)),
            else_case: else_case
                .as_ref()
                .map(|e| Box::new(substitute_stmt(e, map))),
        },
        Stmt::Seq(stmts) => Stmt::Seq(stmts.iter().map(|s| substitute_stmt(s, map)).collect()),
        Stmt::Store {
            buffer,
            index,
            value,
        } => Stmt::Store {
            buffer: buffer.clone(),
            index: substitute_expr(index, map),
            value: substitute_expr(value, map),
        },
        Stmt::NoOp => Stmt::NoOp,
    }
}

//! Statement construction helpers and IR validation.
//!
//! The helpers never produce trivially empty structure: a loop of extent 0, a
//! loop around a no-op, a conditional with nothing in either branch and an
//! empty sequence all collapse to [`Stmt::NoOp`].

use super::simplify::simplify;
use crate::error::{IrError, IrResult};
use crate::ir::{Expr, PrimFunc, Stmt, Var};

/// Build a loop `for var in [min, min + extent)`.
///
/// The bounds are simplified first. A constant negative extent is rejected.
pub fn make_for(var: Var, min: Expr, extent: Expr, body: Stmt) -> IrResult<Stmt> {
    let min = simplify(&min);
    let extent = simplify(&extent);
    if min.uses_var(&var) || extent.uses_var(&var) {
        return Err(IrError::SelfReferentialBounds(var));
    }
    match extent.as_int() {
        Some(e) if e < 0 => return Err(IrError::NegativeExtent { var, extent: e }),
        Some(0) => return Ok(Stmt::NoOp),
        _ => {}
    }
    if body.is_noop() {
        return Ok(Stmt::NoOp);
    }
    Ok(Stmt::for_range(var, min, extent, body))
}

/// Build a conditional, dropping an empty else branch
pub fn make_if(condition: Expr, then_case: Stmt, else_case: Option<Stmt>) -> Stmt {
    let else_case = else_case.filter(|e| !e.is_noop());
    match else_case {
        None if then_case.is_noop() => Stmt::NoOp,
        None => Stmt::if_then(condition, then_case),
        Some(else_case) => Stmt::if_then_else(condition, then_case, else_case),
    }
}

/// Build a sequence, flattening nested sequences and dropping no-ops
pub fn make_seq(stmts: Vec<Stmt>) -> Stmt {
    let mut flat = Vec::with_capacity(stmts.len());
    for stmt in stmts {
        match stmt {
            Stmt::NoOp => {}
            Stmt::Seq(inner) => flat.extend(inner.into_iter().filter(|s| !s.is_noop())),
            other => flat.push(other),
        }
    }
    match flat.len() {
        0 => Stmt::NoOp,
        1 => flat.pop().unwrap_or(Stmt::NoOp),
        _ => Stmt::Seq(flat),
    }
}

/// Check that a function body is well formed.
///
/// Every variable must be a parameter or an enclosing loop variable, no loop
/// may have a constant negative extent, and loop bounds may not mention the
/// loop's own variable.
pub fn validate(func: &PrimFunc) -> IrResult<()> {
    let mut scope: Vec<Var> = func.params.clone();
    validate_stmt(&func.body, &mut scope)
}

fn validate_stmt(stmt: &Stmt, scope: &mut Vec<Var>) -> IrResult<()> {
    match stmt {
        Stmt::For {
            var,
            min,
            extent,
            body,
        } => {
            for bound in [min, extent] {
                if bound.uses_var(var) && !scope.contains(var) {
                    return Err(IrError::SelfReferentialBounds(var.clone()));
                }
                check_vars(bound, scope)?;
            }
            if let Some(e) = extent.as_int().filter(|e| *e < 0) {
                return Err(IrError::NegativeExtent {
                    var: var.clone(),
                    extent: e,
                });
            }
            scope.push(var.clone());
            let result = validate_stmt(body, scope);
            scope.pop();
            result
        }
        Stmt::IfThenElse {
            condition,
            then_case,
            else_case,
        } => {
            check_vars(condition, scope)?;
            validate_stmt(then_case, scope)?;
            match else_case {
                Some(e) => validate_stmt(e, scope),
                None => Ok(()),
            }
        }
        Stmt::Seq(stmts) => stmts.iter().try_for_each(|s| validate_stmt(s, scope)),
        Stmt::Store { index, value, .. } => {
            check_vars(index, scope)?;
            check_vars(value, scope)
        }
        Stmt::NoOp => Ok(()),
    }
}

fn check_vars(expr: &Expr, scope: &[Var]) -> IrResult<()> {
    match expr.free_vars().into_iter().find(|v| !scope.contains(v)) {
        Some(unbound) => Err(IrError::UnboundVariable(unbound)),
        None => Ok(()),
    }
}

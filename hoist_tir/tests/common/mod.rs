//! Shared helpers for integration tests
// Each test target uses a different subset of these helpers.
#![allow(dead_code)]

use hoist_tir::rewrite::{simplify, substitute_expr, SubstMap};
use hoist_tir::{Expr, Stmt, Var};

/// Evaluate a ground-able expression under a full variable assignment
pub fn eval_at(expr: &Expr, assignment: &[(&str, i64)]) -> Expr {
    let map: SubstMap = assignment
        .iter()
        .map(|(name, value)| (Var::new(*name), Expr::int(*value)))
        .collect();
    simplify(&substitute_expr(expr, &map))
}

/// Evaluate a predicate under a full assignment.
///
/// Panics if the predicate does not reduce to a constant.
pub fn holds_at(cond: &Expr, assignment: &[(&str, i64)]) -> bool {
    match eval_at(cond, assignment) {
        Expr::Bool(b) => b,
        other => panic!("{} did not reduce to a boolean: {}", cond, other),
    }
}

/// Every integer point of the box `[lo_x, hi_x] x [lo_y, hi_y]`
pub fn grid(x: (i64, i64), y: (i64, i64)) -> Vec<[(&'static str, i64); 2]> {
    let mut points = Vec::new();
    for xv in x.0..=x.1 {
        for yv in y.0..=y.1 {
            points.push([("x", xv), ("y", yv)]);
        }
    }
    points
}

/// `for o in [0, outer_extent): for i in [0, factor): if o*factor + i < n { out[o*factor+i] = (o*factor+i) * 2 }`
pub fn split_nest(n: Expr, outer_extent: Expr, factor: i64) -> Stmt {
    let index = Expr::var("o") * Expr::int(factor) + Expr::var("i");
    Stmt::for_range(
        Var::new("o"),
        Expr::int(0),
        outer_extent,
        Stmt::for_range(
            Var::new("i"),
            Expr::int(0),
            Expr::int(factor),
            Stmt::if_then(
                Expr::lt(index.clone(), n),
                Stmt::store("out", index.clone(), index * Expr::int(2)),
            ),
        ),
    )
}

/// Split nest over a constant extent, outer extent `ceil(n / factor)`
pub fn constant_split(n: i64, factor: i64) -> Stmt {
    split_nest(Expr::int(n), Expr::int((n + factor - 1) / factor), factor)
}

/// Split nest over a symbolic extent `n`, outer extent `floordiv(n + factor - 1, factor)`
pub fn symbolic_split(factor: i64) -> Stmt {
    let n = Expr::var("n");
    let outer = Expr::floordiv(n.clone() + Expr::int(factor - 1), Expr::int(factor));
    split_nest(n, outer, factor)
}

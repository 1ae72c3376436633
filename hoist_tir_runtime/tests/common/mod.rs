//! Shared helpers for integration tests
// Each test target uses a different subset of these helpers.
#![allow(dead_code)]

use hoist_tir::{Expr, PrimFunc, Stmt, Var};
use hoist_tir_runtime::{execute, Buffers, Execution};

/// `out[k] = 2k` for `k < n`, as a loop split by `factor` with a boundary check
pub fn split_body(n: Expr, outer_extent: Expr, factor: i64) -> Stmt {
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

/// Split function over a constant extent
pub fn constant_func(n: i64, factor: i64) -> PrimFunc {
    PrimFunc::new(
        "split_const",
        vec![],
        vec!["out".to_string()],
        split_body(Expr::int(n), Expr::int((n + factor - 1) / factor), factor),
    )
}

/// Split function over a scalar parameter `n`
pub fn symbolic_func(factor: i64) -> PrimFunc {
    let n = Expr::var("n");
    let outer = Expr::floordiv(n.clone() + Expr::int(factor - 1), Expr::int(factor));
    PrimFunc::new(
        "split_sym",
        vec![Var::new("n")],
        vec!["out".to_string()],
        split_body(n, outer, factor),
    )
}

/// Sum of `2k` over `k < n` accumulated into `acc[0]`, split by `factor`
pub fn reduction_func(factor: i64) -> PrimFunc {
    let n = Expr::var("n");
    let index = Expr::var("o") * Expr::int(factor) + Expr::var("i");
    let acc = Expr::load("acc", Expr::int(0));
    let body = Stmt::for_range(
        Var::new("o"),
        Expr::int(0),
        Expr::floordiv(n.clone() + Expr::int(factor - 1), Expr::int(factor)),
        Stmt::for_range(
            Var::new("i"),
            Expr::int(0),
            Expr::int(factor),
            Stmt::if_then(
                Expr::lt(index.clone(), n),
                Stmt::store("acc", Expr::int(0), acc + index * Expr::int(2)),
            ),
        ),
    );
    PrimFunc::new("split_reduce", vec![Var::new("n")], vec!["acc".to_string()], body)
}

/// Run with an `out` buffer of `len` elements
pub fn run_out(func: &PrimFunc, args: &[i64], len: usize) -> Execution {
    execute(func, args, Buffers::new().with_buffer("out", len))
        .unwrap_or_else(|err| panic!("{} failed on {:?}: {}\n{}", func.name, args, err, func))
}

/// Length of an `out` buffer for extent `n`
pub fn out_len(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}

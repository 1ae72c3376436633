//! Structural properties of guard hoisting on split loop nests.

mod common;

use common::{constant_split, split_nest, symbolic_split};
use hoist_tir::{hoist, ConditionHoister, Expr, HoistConfig, Stmt, Var};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Number of outermost loops whose body has no conditional
fn guard_free_loops(stmt: &Stmt) -> usize {
    match stmt {
        Stmt::For { body, .. } if body.count_conditionals() == 0 => 1,
        Stmt::For { body, .. } => guard_free_loops(body),
        Stmt::IfThenElse {
            then_case,
            else_case,
            ..
        } => guard_free_loops(then_case) + else_case.as_ref().map_or(0, |e| guard_free_loops(e)),
        Stmt::Seq(stmts) => stmts.iter().map(guard_free_loops).sum(),
        Stmt::Store { .. } | Stmt::NoOp => 0,
    }
}

#[test]
fn test_divisible_extents_have_no_conditionals() {
    for factor in 1..=8 {
        for outer in 1..=6 {
            let out = hoist(constant_split(outer * factor, factor));
            assert_eq!(out.count_conditionals(), 0, "N = {}, factor = {}", outer * factor, factor);
        }
    }
}

#[test]
fn test_boundary_split_prefix_is_guard_free() {
    // N = 15 split by 4: outer iterations 0..2 need no check
    let out = hoist(constant_split(15, 4));
    let Stmt::Seq(parts) = &out else {
        panic!("expected the outer loop to be split:\n{}", out);
    };
    assert_eq!(parts.len(), 2);
    assert_eq!(
        parts[0],
        Stmt::for_range(
            Var::new("o"),
            Expr::int(0),
            Expr::int(3),
            Stmt::for_range(
                Var::new("i"),
                Expr::int(0),
                Expr::int(4),
                Stmt::store(
                    "out",
                    Expr::var("o") * Expr::int(4) + Expr::var("i"),
                    (Expr::var("o") * Expr::int(4) + Expr::var("i")) * Expr::int(2),
                ),
            ),
        )
    );
    match &parts[1] {
        Stmt::For { min, extent, body, .. } => {
            assert_eq!(min, &Expr::int(3));
            assert_eq!(extent, &Expr::int(1));
            assert!(body.count_conditionals() > 0);
        }
        other => panic!("expected the guarded remainder loop, got\n{}", other),
    }
}

#[test]
fn test_unanalyzable_guard_is_untouched() {
    let i = Var::new("i");
    let nest = Stmt::for_range(
        i.clone(),
        Expr::int(0),
        Expr::int(16),
        Stmt::if_then(
            Expr::lt(Expr::load("mask", Expr::from(&i)), Expr::int(1)),
            Stmt::store("out", Expr::from(&i), Expr::int(0)),
        ),
    );
    assert_eq!(hoist(nest.clone()), nest);

    let parity = Stmt::for_range(
        i.clone(),
        Expr::int(0),
        Expr::int(16),
        Stmt::if_then(
            Expr::eq(Expr::floormod(Expr::from(&i), Expr::int(2)), Expr::int(0)),
            Stmt::store("out", Expr::from(&i), Expr::int(0)),
        ),
    );
    assert_eq!(hoist(parity.clone()), parity);
}

#[test]
fn test_never_true_guard_is_untouched() {
    let nest = constant_split(15, 4);
    let never = split_nest(Expr::int(-1), Expr::int(4), 4);
    assert_eq!(hoist(never.clone()), never);
    assert_ne!(hoist(nest.clone()), nest);
}

#[test]
fn test_hoist_is_deterministic() {
    let a = hoist(symbolic_split(4));
    let b = hoist(symbolic_split(4));
    assert_eq!(a, b);
    assert_eq!(a.to_string(), b.to_string());
}

#[test]
fn test_deep_nest_terminates() {
    // Four levels of split loops, each with its own boundary check
    let mut body = Stmt::store("out", Expr::var("l3"), Expr::int(1));
    for level in (0..4).rev() {
        let var = Var::new(format!("l{}", level));
        body = Stmt::for_range(
            var.clone(),
            Expr::int(0),
            Expr::int(8),
            Stmt::if_then(Expr::lt(Expr::from(&var), Expr::var("n")), body),
        );
    }
    let mut hoister = ConditionHoister::new();
    let out = hoister.hoist(body);
    assert!(hoister.stats().iterations < HoistConfig::default().max_iterations);
    assert_eq!(hoist(out.clone()), out);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_hoist_is_idempotent(n in 0i64..48, factor in 1i64..8) {
        let once = hoist(constant_split(n, factor));
        prop_assert_eq!(hoist(once.clone()), once);
    }

    #[test]
    fn prop_symbolic_hoist_is_idempotent(factor in 1i64..8) {
        let once = hoist(symbolic_split(factor));
        prop_assert_eq!(hoist(once.clone()), once);
    }

    #[test]
    fn prop_full_tiles_run_guard_free(n in 1i64..48, factor in 2i64..8) {
        let out = hoist(constant_split(n, factor));
        // At least one guard-free loop appears whenever some full tile exists
        if n >= factor {
            prop_assert!(guard_free_loops(&out) >= 1, "no guard-free loop in\n{}", out);
        }
        prop_assert!(out.count_conditionals() <= 2);
    }
}

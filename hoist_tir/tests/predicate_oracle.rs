//! Range reasoning checked against brute force over small boxes.

mod common;

use common::{grid, holds_at};
use hoist_tir::{evaluate_predicate, CmpOp, Expr, Interval, Truth, Var};
use proptest::prelude::*;
use std::collections::HashMap;

const CMP_OPS: [CmpOp; 6] = [CmpOp::Lt, CmpOp::Le, CmpOp::Gt, CmpOp::Ge, CmpOp::Eq, CmpOp::Ne];

fn box_ranges(x: (i64, i64), y: (i64, i64)) -> HashMap<Var, Interval> {
    let mut ranges = HashMap::new();
    ranges.insert(Var::new("x"), Interval::new(x.0, x.1));
    ranges.insert(Var::new("y"), Interval::new(y.0, y.1));
    ranges
}

/// Truth of `cond` over every point of the box
fn brute_force(cond: &Expr, x: (i64, i64), y: (i64, i64)) -> Truth {
    let results: Vec<bool> = grid(x, y).iter().map(|p| holds_at(cond, p)).collect();
    if results.iter().all(|b| *b) {
        Truth::AlwaysTrue
    } else if results.iter().all(|b| !*b) {
        Truth::AlwaysFalse
    } else {
        Truth::Unknown
    }
}

fn assert_sound(cond: &Expr, x: (i64, i64), y: (i64, i64)) {
    let claimed = evaluate_predicate(cond, &box_ranges(x, y));
    if claimed.is_known() {
        assert_eq!(
            claimed,
            brute_force(cond, x, y),
            "{} over x in {:?}, y in {:?}",
            cond,
            x,
            y
        );
    }
}

#[test]
fn test_affine_ordering_is_exact() {
    let boxes = [((0, 3), (0, 3)), ((-2, 1), (3, 5)), ((4, 4), (-3, 0))];
    for (x, y) in boxes {
        for a in -2..=2 {
            for b in -2..=2 {
                for c in -6..=6 {
                    let lhs = Expr::var("x") * Expr::int(a) + Expr::var("y") * Expr::int(b);
                    for op in [CmpOp::Lt, CmpOp::Le, CmpOp::Gt, CmpOp::Ge] {
                        let cond = Expr::cmp(op, lhs.clone(), Expr::int(c));
                        assert_eq!(
                            evaluate_predicate(&cond, &box_ranges(x, y)),
                            brute_force(&cond, x, y),
                            "{} over x in {:?}, y in {:?}",
                            cond,
                            x,
                            y
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_affine_equality_is_sound() {
    let (x, y) = ((0, 2), (-1, 1));
    for a in -2..=2 {
        for b in -2..=2 {
            for c in -4..=4 {
                let lhs = Expr::var("x") * Expr::int(a) + Expr::var("y") * Expr::int(b);
                assert_sound(&Expr::eq(lhs.clone(), Expr::int(c)), x, y);
                assert_sound(&Expr::ne(lhs, Expr::int(c)), x, y);
            }
        }
    }
}

#[test]
fn test_split_guard_exhaustive() {
    // The boundary check of a loop split by 4, over every outer/inner range
    // prefix and every bound up to 20
    for outer_hi in 0..5 {
        for inner_hi in 0..4 {
            for n in 0..=20 {
                let cond = Expr::lt(Expr::var("x") * Expr::int(4) + Expr::var("y"), Expr::int(n));
                let (x, y) = ((0, outer_hi), (0, inner_hi));
                assert_eq!(
                    evaluate_predicate(&cond, &box_ranges(x, y)),
                    brute_force(&cond, x, y),
                    "{}",
                    cond
                );
            }
        }
    }
}

#[test]
fn test_floordiv_floormod_are_sound() {
    for d in 1..=5 {
        for c in -2..=6 {
            let fd = Expr::floordiv(Expr::var("x") + Expr::var("y"), Expr::int(d));
            let fm = Expr::floormod(Expr::var("x") - Expr::var("y"), Expr::int(d));
            for op in CMP_OPS {
                assert_sound(&Expr::cmp(op, fd.clone(), Expr::int(c)), (-3, 4), (0, 2));
                assert_sound(&Expr::cmp(op, fm.clone(), Expr::int(c)), (-3, 4), (0, 2));
            }
        }
    }
}

// ==================== Random predicates ====================

fn arb_int_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        (-6i64..=6).prop_map(Expr::int),
        Just(Expr::var("x")),
        Just(Expr::var("y")),
    ];
    leaf.prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a + b),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a - b),
            (inner.clone(), -3i64..=3).prop_map(|(a, c)| a * Expr::int(c)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a * b),
            (inner.clone(), 1i64..=4).prop_map(|(a, d)| Expr::floordiv(a, Expr::int(d))),
            (inner.clone(), 1i64..=4).prop_map(|(a, d)| Expr::floormod(a, Expr::int(d))),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::min(a, b)),
            (inner.clone(), inner).prop_map(|(a, b)| Expr::max(a, b)),
        ]
    })
}

fn arb_predicate() -> impl Strategy<Value = Expr> {
    let cmp = (arb_int_expr(), arb_int_expr(), 0usize..CMP_OPS.len())
        .prop_map(|(a, b, op)| Expr::cmp(CMP_OPS[op], a, b));
    cmp.prop_recursive(2, 8, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::and(a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::or(a, b)),
            inner.prop_map(Expr::not),
        ]
    })
}

fn arb_range() -> impl Strategy<Value = (i64, i64)> {
    (-4i64..=4, 0i64..=4).prop_map(|(lo, width)| (lo, lo + width))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn prop_evaluate_predicate_is_sound(cond in arb_predicate(), x in arb_range(), y in arb_range()) {
        let claimed = evaluate_predicate(&cond, &box_ranges(x, y));
        if claimed.is_known() {
            prop_assert_eq!(claimed, brute_force(&cond, x, y), "{}", cond);
        }
    }

    #[test]
    fn prop_bound_contains_every_value(e in arb_int_expr(), x in arb_range(), y in arb_range()) {
        let range = hoist_tir::bound(&e, &box_ranges(x, y));
        for point in grid(x, y) {
            match common::eval_at(&e, &point) {
                Expr::Int(v) => prop_assert!(range.contains(v), "{} = {} outside {}", e, v, range),
                other => prop_assert!(false, "{} did not reduce: {}", e, other),
            }
        }
    }
}

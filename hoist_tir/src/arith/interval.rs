//! Integer intervals with optionally unbounded ends.

use crate::ir::{floor_div, floor_mod};
use std::fmt;

/// A closed integer interval `[lo, hi]`
///
/// `None` on either side means unbounded in that direction. Every operation
/// is conservative: on overflow the affected end becomes unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub lo: Option<i64>,
    pub hi: Option<i64>,
}

impl Interval {
    /// The interval of all integers
    pub const EVERYTHING: Interval = Interval { lo: None, hi: None };

    pub fn new(lo: i64, hi: i64) -> Self {
        debug_assert!(lo <= hi, "empty interval [{}, {}]", lo, hi);
        Interval {
            lo: Some(lo),
            hi: Some(hi),
        }
    }

    pub fn point(value: i64) -> Self {
        Interval::new(value, value)
    }

    pub fn everything() -> Self {
        Self::EVERYTHING
    }

    /// `[lo, +inf)`
    pub fn at_least(lo: i64) -> Self {
        Interval {
            lo: Some(lo),
            hi: None,
        }
    }

    /// `(-inf, hi]`
    pub fn at_most(hi: i64) -> Self {
        Interval {
            lo: None,
            hi: Some(hi),
        }
    }

    /// The iteration set `[min, min + extent)` of a loop with constant bounds.
    ///
    /// Returns `None` for an empty loop.
    pub fn from_min_extent(min: i64, extent: i64) -> Option<Self> {
        if extent <= 0 {
            return None;
        }
        let hi = min.checked_add(extent - 1);
        Some(Interval { lo: Some(min), hi })
    }

    pub fn as_point(&self) -> Option<i64> {
        match (self.lo, self.hi) {
            (Some(lo), Some(hi)) if lo == hi => Some(lo),
            _ => None,
        }
    }

    pub fn is_everything(&self) -> bool {
        self.lo.is_none() && self.hi.is_none()
    }

    pub fn is_bounded(&self) -> bool {
        self.lo.is_some() && self.hi.is_some()
    }

    pub fn contains(&self, value: i64) -> bool {
        self.lo.map_or(true, |lo| lo <= value) && self.hi.map_or(true, |hi| value <= hi)
    }

    /// Whether `other` lies entirely inside `self`
    pub fn contains_interval(&self, other: &Interval) -> bool {
        let lo_ok = match (self.lo, other.lo) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(a), Some(b)) => a <= b,
        };
        let hi_ok = match (self.hi, other.hi) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(a), Some(b)) => b <= a,
        };
        lo_ok && hi_ok
    }

    /// Smallest interval containing both operands
    pub fn union(&self, other: &Interval) -> Interval {
        Interval {
            lo: match (self.lo, other.lo) {
                (Some(a), Some(b)) => Some(a.min(b)),
                _ => None,
            },
            hi: match (self.hi, other.hi) {
                (Some(a), Some(b)) => Some(a.max(b)),
                _ => None,
            },
        }
    }

    pub fn add(&self, other: &Interval) -> Interval {
        Interval {
            lo: combine(self.lo, other.lo, i64::checked_add),
            hi: combine(self.hi, other.hi, i64::checked_add),
        }
    }

    pub fn neg(&self) -> Interval {
        Interval {
            lo: self.hi.and_then(i64::checked_neg),
            hi: self.lo.and_then(i64::checked_neg),
        }
    }

    pub fn sub(&self, other: &Interval) -> Interval {
        self.add(&other.neg())
    }

    /// Scale by a constant factor
    pub fn scale(&self, factor: i64) -> Interval {
        if factor == 0 {
            return Interval::point(0);
        }
        let lo = self.lo.and_then(|v| v.checked_mul(factor));
        let hi = self.hi.and_then(|v| v.checked_mul(factor));
        if factor > 0 {
            Interval { lo, hi }
        } else {
            Interval { lo: hi, hi: lo }
        }
    }

    pub fn mul(&self, other: &Interval) -> Interval {
        if let Some(c) = other.as_point() {
            return self.scale(c);
        }
        if let Some(c) = self.as_point() {
            return other.scale(c);
        }
        match (self.lo, self.hi, other.lo, other.hi) {
            (Some(a), Some(b), Some(c), Some(d)) => {
                let corners = [
                    a.checked_mul(c),
                    a.checked_mul(d),
                    b.checked_mul(c),
                    b.checked_mul(d),
                ];
                let values: Option<Vec<i64>> = corners.into_iter().collect();
                match values {
                    Some(values) => Interval {
                        lo: values.iter().copied().min(),
                        hi: values.iter().copied().max(),
                    },
                    None => Interval::EVERYTHING,
                }
            }
            // Both operands non-negative keeps a lower bound of lo * lo
            (Some(a), _, Some(c), _) if a >= 0 && c >= 0 => Interval {
                lo: a.checked_mul(c),
                hi: None,
            },
            _ => Interval::EVERYTHING,
        }
    }

    /// Floor division by a positive constant.
    ///
    /// Any other divisor gives an unbounded result.
    pub fn floor_div(&self, divisor: i64) -> Interval {
        if divisor <= 0 {
            return Interval::EVERYTHING;
        }
        Interval {
            lo: self.lo.and_then(|v| floor_div(v, divisor)),
            hi: self.hi.and_then(|v| floor_div(v, divisor)),
        }
    }

    /// Floor modulo by a positive constant.
    pub fn floor_mod(&self, divisor: i64) -> Interval {
        if divisor <= 0 {
            return Interval::EVERYTHING;
        }
        let full = Interval::new(0, divisor - 1);
        if let (Some(lo), Some(hi)) = (self.lo, self.hi) {
            // Stays inside one period: the remainder range is exact
            if floor_div(lo, divisor) == floor_div(hi, divisor) {
                if let (Some(a), Some(b)) = (floor_mod(lo, divisor), floor_mod(hi, divisor)) {
                    return Interval::new(a, b);
                }
            }
        }
        full
    }

    pub fn min(&self, other: &Interval) -> Interval {
        Interval {
            lo: match (self.lo, other.lo) {
                (Some(a), Some(b)) => Some(a.min(b)),
                _ => None,
            },
            hi: match (self.hi, other.hi) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (Some(a), None) | (None, Some(a)) => Some(a),
                (None, None) => None,
            },
        }
    }

    pub fn max(&self, other: &Interval) -> Interval {
        Interval {
            lo: match (self.lo, other.lo) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (Some(a), None) | (None, Some(a)) => Some(a),
                (None, None) => None,
            },
            hi: match (self.hi, other.hi) {
                (Some(a), Some(b)) => Some(a.max(b)),
                _ => None,
            },
        }
    }
}

fn combine(a: Option<i64>, b: Option<i64>, op: fn(i64, i64) -> Option<i64>) -> Option<i64> {
    op(a?, b?)
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lo {
            Some(lo) => write!(f, "[{}, ", lo)?,
            None => write!(f, "(-inf, ")?,
        }
        match self.hi {
            Some(hi) => write!(f, "{}]", hi),
            None => write!(f, "+inf)"),
        }
    }
}

//! Interval-valued robustness scores (RoSI: robustness with indeterminacy).
//!
//! Role
//! - Represent the quantitative satisfaction of a formula on a trace as a
//!   closed interval `[lower, upper]` over the extended reals.
//! - `upper < 0` means the formula is violated on the trace, `lower > 0`
//!   means it is satisfied; anything else is still undetermined.
//!
//! The interval shrinks to a single committed value once every step the
//! formula inspects lies within the trace.

use std::fmt;

/// Closed robustness interval over the extended reals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rosi {
    lower: f64,
    upper: f64,
}

impl Rosi {
    /// Interval `[lower, upper]`. Requires `lower <= upper`.
    #[inline]
    pub fn new(lower: f64, upper: f64) -> Self {
        debug_assert!(lower <= upper, "RoSI requires lower <= upper");
        Rosi { lower, upper }
    }

    /// Committed (degenerate) interval `[v, v]`.
    #[inline]
    pub fn committed(v: f64) -> Self {
        Rosi { lower: v, upper: v }
    }

    /// Fully indeterminate interval `(-inf, +inf)`.
    #[inline]
    pub fn unknown() -> Self {
        Rosi {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }

    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Pointwise interval minimum; robustness of a conjunction.
    #[inline]
    pub fn min(self, other: Rosi) -> Rosi {
        Rosi {
            lower: self.lower.min(other.lower),
            upper: self.upper.min(other.upper),
        }
    }

    /// Pointwise interval maximum; robustness of a disjunction.
    #[inline]
    pub fn max(self, other: Rosi) -> Rosi {
        Rosi {
            lower: self.lower.max(other.lower),
            upper: self.upper.max(other.upper),
        }
    }

    /// Robustness of a negation: `[-upper, -lower]`.
    #[inline]
    pub fn negate(self) -> Rosi {
        Rosi {
            lower: -self.upper,
            upper: -self.lower,
        }
    }

    /// The interval lies strictly below zero: the formula is falsified.
    #[inline]
    pub fn is_violated(&self) -> bool {
        self.upper < 0.0
    }

    /// The interval lies strictly above zero: the formula is satisfied.
    #[inline]
    pub fn is_satisfied(&self) -> bool {
        self.lower > 0.0
    }

    /// Neither bound commits the sign yet.
    #[inline]
    pub fn is_undetermined(&self) -> bool {
        !self.is_violated() && !self.is_satisfied()
    }

    /// Collapse to a single representative value.
    ///
    /// Prefers a finite readout: the midpoint when both bounds are finite,
    /// otherwise the finite bound, otherwise zero.
    pub fn robustness(&self) -> f64 {
        match (self.lower.is_finite(), self.upper.is_finite()) {
            (true, true) => (self.lower + self.upper) / 2.0,
            (false, true) => self.upper,
            (true, false) => self.lower,
            (false, false) => 0.0,
        }
    }
}

impl fmt::Display for Rosi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_predicates() {
        assert!(Rosi::committed(-1.0).is_violated());
        assert!(Rosi::committed(1.0).is_satisfied());
        assert!(Rosi::new(-1.0, 1.0).is_undetermined());
        assert!(Rosi::unknown().is_undetermined());
    }

    #[test]
    fn negate_swaps_and_flips() {
        let r = Rosi::new(-3.0, 2.0).negate();
        assert_eq!(r.lower(), -2.0);
        assert_eq!(r.upper(), 3.0);
    }

    #[test]
    fn min_max_are_pointwise() {
        let a = Rosi::new(-1.0, 4.0);
        let b = Rosi::new(0.0, 2.0);
        assert_eq!(a.min(b), Rosi::new(-1.0, 2.0));
        assert_eq!(a.max(b), Rosi::new(0.0, 4.0));
    }

    #[test]
    fn representative_readout() {
        assert_eq!(Rosi::new(1.0, 3.0).robustness(), 2.0);
        assert_eq!(Rosi::new(f64::NEG_INFINITY, 3.0).robustness(), 3.0);
        assert_eq!(Rosi::new(1.0, f64::INFINITY).robustness(), 1.0);
        assert_eq!(Rosi::unknown().robustness(), 0.0);
    }
}

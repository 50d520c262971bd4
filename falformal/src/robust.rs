//! RoSI evaluation of formulas over discretized traces.
//!
//! Role
//! - Compute the quantitative satisfaction interval of a [`Formula`] on an
//!   [`IoTrace`] at a given step, as an exhaustive match over node kinds.
//!
//! Semantics
//! - Atomic `signal < c` is `c - x`, `signal > c` is `x - c`, `signal == c`
//!   is `-|x - c|`; all three commit to a degenerate interval.
//! - `And`/`Or`/`Not` are interval min/max/negation.
//! - `Next` evaluates the child one step later; at the last step the result
//!   is fully indeterminate, since the missing suffix is unknown.
//! - A bounded window that overruns the trace folds in the unknown interval,
//!   so the result is indeterminate rather than a hard failure. Unbounded
//!   `Global`/`Eventually`/`Until` treat the finite trace as the complete
//!   word.
//!
//! Errors
//! - An out-of-range signal index in an atomic predicate is a fatal
//!   configuration error and is reported, never clamped.

use thiserror::Error;

use crate::formula::{ComparisonOp, Formula, TemporalOp};
use crate::rosi::Rosi;
use crate::trace::IoTrace;

/// Evaluation-time contract violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("signal index {index} out of range for output of arity {arity} at step {step}")]
    SignalIndex {
        index: usize,
        arity: usize,
        step: usize,
    },
}

impl Formula {
    /// Evaluate this formula on `trace` starting at step `t`.
    pub fn robustness(&self, trace: &IoTrace, t: usize) -> Result<Rosi, FormulaError> {
        match self {
            Formula::Atomic {
                signal,
                cmp,
                threshold,
            } => {
                let Some(piece) = trace.piece(t) else {
                    return Ok(Rosi::unknown());
                };
                let output = piece.output();
                let x = *output
                    .get(*signal)
                    .ok_or(FormulaError::SignalIndex {
                        index: *signal,
                        arity: output.len(),
                        step: t,
                    })?;
                let margin = match cmp {
                    ComparisonOp::Less => threshold - x,
                    ComparisonOp::Greater => x - threshold,
                    ComparisonOp::Equal => -(x - threshold).abs(),
                };
                Ok(Rosi::committed(margin))
            }
            Formula::Not(a) => Ok(a.robustness(trace, t)?.negate()),
            Formula::And(a, b) => Ok(a.robustness(trace, t)?.min(b.robustness(trace, t)?)),
            Formula::Or(a, b) => Ok(a.robustness(trace, t)?.max(b.robustness(trace, t)?)),
            Formula::Next(a) => {
                if t + 1 < trace.len() {
                    a.robustness(trace, t + 1)
                } else {
                    Ok(Rosi::unknown())
                }
            }
            Formula::Global(a) => {
                let mut acc: Option<Rosi> = None;
                for u in t..trace.len() {
                    let r = a.robustness(trace, u)?;
                    acc = Some(acc.map_or(r, |v| v.min(r)));
                }
                Ok(acc.unwrap_or_else(Rosi::unknown))
            }
            Formula::Eventually(a) => {
                let mut acc: Option<Rosi> = None;
                for u in t..trace.len() {
                    let r = a.robustness(trace, u)?;
                    acc = Some(acc.map_or(r, |v| v.max(r)));
                }
                Ok(acc.unwrap_or_else(Rosi::unknown))
            }
            Formula::Until(left, right) => {
                // max over witnessing steps j of min(right@j, min of left before j)
                let mut best: Option<Rosi> = None;
                let mut left_min: Option<Rosi> = None;
                for j in t..trace.len() {
                    let right_j = right.robustness(trace, j)?;
                    let witness = left_min.map_or(right_j, |lm| right_j.min(lm));
                    best = Some(best.map_or(witness, |b| b.max(witness)));
                    let left_j = left.robustness(trace, j)?;
                    left_min = Some(left_min.map_or(left_j, |lm| lm.min(left_j)));
                }
                Ok(best.unwrap_or_else(Rosi::unknown))
            }
            Formula::Bounded {
                op,
                from,
                to,
                child,
            } => {
                let mut acc: Option<Rosi> = None;
                for u in (t + from)..=(t + to) {
                    let r = if u < trace.len() {
                        child.robustness(trace, u)?
                    } else {
                        Rosi::unknown()
                    };
                    acc = Some(match (acc, op) {
                        (None, _) => r,
                        (Some(v), TemporalOp::Global) => v.min(r),
                        (Some(v), TemporalOp::Eventually) => v.max(r),
                    });
                }
                // The window is never empty since from <= to.
                Ok(acc.unwrap_or_else(Rosi::unknown))
            }
        }
    }
}

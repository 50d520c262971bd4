//! Falformal: immutable STL/LTL formulas and quantitative robustness.
//!
//! This crate provides the formula model used by a falsification engine for
//! cyber-physical systems: a closed tree-shaped AST for Signal Temporal Logic
//! formulas, a canonical textual form that defines structural equality and
//! hashing, and an interval-valued robustness evaluator (RoSI: robustness
//! with indeterminacy) over discretized input/output traces.
//!
//! Identity semantics
//!  - Formulas are pure value trees; nodes are never mutated after
//!    construction. Two independently built trees denoting the same formula
//!    compare and hash equal, because equality is defined over the canonical
//!    string form ([`Formula`]'s `Display`).
//!
//! Robustness semantics
//!  - Boolean connectives combine robustness by interval min/max/negation.
//!  - Bounded temporal windows that extend past the end of the trace fold in
//!    the fully indeterminate interval instead of failing.
//!  - An out-of-range signal index in an atomic predicate is a fatal
//!    evaluation error, never silently clamped.
//!
//! Example
//! ```
//! use falformal::prelude::*;
//!
//! let p = Formula::atomic(0, ComparisonOp::Less, 10.0);
//! let q = Formula::atomic(1, ComparisonOp::Greater, 2.0);
//! let f = p.clone() | q;
//!
//! let trace = IoTrace::from_steps(vec![(vec![0.0], vec![4.0, 5.0])]);
//! let rosi = f.robustness(&trace, 0).unwrap();
//! assert!(rosi.is_satisfied());
//! assert_eq!(p, Formula::atomic(0, ComparisonOp::Less, 10.0));
//! ```

/// Formula AST: node variants, smart constructors, canonical form.
pub mod formula;
/// Width-aware, color-annotated pretty-printer for formulas.
pub mod pretty;
/// RoSI evaluation of formulas over traces.
pub mod robust;
/// Interval-valued robustness scores.
pub mod rosi;
/// Discretized input/output traces.
pub mod trace;

pub mod prelude {
    //! Convenient re-exports for end users.
    pub use crate::formula::{ComparisonOp, Formula, FormulaKind, TemporalOp};
    pub use crate::pretty::PrettyFormula;
    pub use crate::robust::FormulaError;
    pub use crate::rosi::Rosi;
    pub use crate::trace::{IoSignalPiece, IoTrace};
}

pub use formula::{ComparisonOp, Formula, FormulaKind, TemporalOp};
pub use robust::FormulaError;
pub use rosi::Rosi;
pub use trace::{IoSignalPiece, IoTrace};

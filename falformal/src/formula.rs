//! Formula AST: a closed sum type over STL/LTL node kinds.
//!
//! Role
//! - Represent formulas as immutable value trees with boxed children.
//! - Define the canonical string form used for equality and hashing.
//! - Provide smart constructors plus `&`, `|` and `!` operator sugar.
//!
//! Identity
//! - [`Formula`] implements `PartialEq`/`Eq`/`Hash` over its canonical string
//!   (`Display`), so differently built trees denoting the same formula are
//!   interchangeable as map keys and in membership tests.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops;

use strum::{Display, EnumIs};

/// Comparison operator of an atomic predicate over one signal dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIs)]
pub enum ComparisonOp {
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = "==")]
    Equal,
}

/// Temporal operator carried by a [`Formula::Bounded`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
pub enum TemporalOp {
    Global,
    Eventually,
}

/// Discriminant identifying the kind of a formula node.
///
/// Mirrors the shape of [`Formula`] without payloads; used by the
/// pretty-printer's precedence table and by code that only needs to branch on
/// the outer constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
pub enum FormulaKind {
    Atomic,
    Not,
    And,
    Or,
    Next,
    Global,
    Eventually,
    Until,
    Bounded,
}

/// Immutable STL/LTL formula tree.
///
/// Unbounded `Global`/`Eventually` are implicitly `[0, ∞)`; a
/// [`Formula::Bounded`] node is the only node type carrying an explicit time
/// interval, and it only wraps `Global` or `Eventually`.
#[derive(Debug, Clone)]
pub enum Formula {
    /// Compare one output-signal dimension against a constant threshold.
    Atomic {
        signal: usize,
        cmp: ComparisonOp,
        threshold: f64,
    },
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    /// Evaluate the child one step later.
    Next(Box<Formula>),
    Global(Box<Formula>),
    Eventually(Box<Formula>),
    Until(Box<Formula>, Box<Formula>),
    /// `op` over the window `[from, to]` (inclusive, in trace steps).
    Bounded {
        op: TemporalOp,
        from: usize,
        to: usize,
        child: Box<Formula>,
    },
}

impl Formula {
    /// `signal(i) cmp threshold`.
    #[inline]
    pub fn atomic(signal: usize, cmp: ComparisonOp, threshold: f64) -> Self {
        Formula::Atomic {
            signal,
            cmp,
            threshold,
        }
    }

    #[inline]
    pub fn not(f: Formula) -> Self {
        Formula::Not(Box::new(f))
    }

    #[inline]
    pub fn and(a: Formula, b: Formula) -> Self {
        Formula::And(Box::new(a), Box::new(b))
    }

    #[inline]
    pub fn or(a: Formula, b: Formula) -> Self {
        Formula::Or(Box::new(a), Box::new(b))
    }

    #[inline]
    pub fn next(f: Formula) -> Self {
        Formula::Next(Box::new(f))
    }

    #[inline]
    pub fn global(f: Formula) -> Self {
        Formula::Global(Box::new(f))
    }

    #[inline]
    pub fn eventually(f: Formula) -> Self {
        Formula::Eventually(Box::new(f))
    }

    #[inline]
    pub fn until(left: Formula, right: Formula) -> Self {
        Formula::Until(Box::new(left), Box::new(right))
    }

    /// Bounded temporal operator over `[from, to]`. Requires `from <= to`.
    #[inline]
    pub fn bounded(op: TemporalOp, from: usize, to: usize, child: Formula) -> Self {
        assert!(from <= to, "bounded interval requires from <= to");
        Formula::Bounded {
            op,
            from,
            to,
            child: Box::new(child),
        }
    }

    /// Return the discriminant identifying the kind of this node.
    #[inline]
    pub fn kind(&self) -> FormulaKind {
        match self {
            Formula::Atomic { .. } => FormulaKind::Atomic,
            Formula::Not(_) => FormulaKind::Not,
            Formula::And(_, _) => FormulaKind::And,
            Formula::Or(_, _) => FormulaKind::Or,
            Formula::Next(_) => FormulaKind::Next,
            Formula::Global(_) => FormulaKind::Global,
            Formula::Eventually(_) => FormulaKind::Eventually,
            Formula::Until(_, _) => FormulaKind::Until,
            Formula::Bounded { .. } => FormulaKind::Bounded,
        }
    }

    /// Canonical textual form; identical to the `Display` rendering.
    ///
    /// This is the string equality and hashing are defined over, so it is
    /// fully parenthesized and layout-free. For human-oriented output see
    /// [`PrettyFormula`](crate::pretty::PrettyFormula).
    pub fn syntax_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Atomic {
                signal,
                cmp,
                threshold,
            } => write!(f, "signal({signal}) {cmp} {threshold}"),
            Formula::Not(a) => write!(f, "!( {a} )"),
            Formula::And(a, b) => write!(f, "( {a} ) && ( {b} )"),
            Formula::Or(a, b) => write!(f, "( {a} ) || ( {b} )"),
            Formula::Next(a) => write!(f, "X ( {a} )"),
            Formula::Global(a) => write!(f, "[] ( {a} )"),
            Formula::Eventually(a) => write!(f, "<> ( {a} )"),
            Formula::Until(a, b) => write!(f, "( {a} ) U ( {b} )"),
            Formula::Bounded {
                op,
                from,
                to,
                child,
            } => {
                let sym = match op {
                    TemporalOp::Global => "[]",
                    TemporalOp::Eventually => "<>",
                };
                write!(f, "{sym}_[{from}, {to}] ( {child} )")
            }
        }
    }
}

impl PartialEq for Formula {
    /// Structural equality via the canonical string form.
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl ops::BitAnd for Formula {
    type Output = Formula;

    fn bitand(self, rhs: Formula) -> Formula {
        Formula::and(self, rhs)
    }
}

impl ops::BitOr for Formula {
    type Output = Formula;

    fn bitor(self, rhs: Formula) -> Formula {
        Formula::or(self, rhs)
    }
}

impl ops::Not for Formula {
    type Output = Formula;

    fn not(self) -> Formula {
        Formula::not(self)
    }
}

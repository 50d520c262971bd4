//! Adaptive property strengthening.
//!
//! Role
//! - Own the evolving set of formulas exposed to the falsification search.
//!   Each user-supplied target contributes a list of strengthened variants
//!   (its *slots*) plus the target itself; when the search falsifies an
//!   exposed formula, the owning slot is refilled with a strictly stronger
//!   variant so the search keeps making progress.
//!
//! Refinement streams
//! - [`strengthen`] rewrites a formula into syntactically stronger variants:
//!   any trace falsifying a variant also falsifies the original.
//! - [`find_intervals`] locates interval-bearing positions (`Bounded` nodes,
//!   and bare `Next` treated as `[]_[1,1]`), each yielding an
//!   [`IntervalFrontier`] that emits a finite, strictly tightening sequence
//!   of window variants by bisecting the slack back toward the original
//!   bounds.
//!
//! Slots carry their provenance (interval frontier index or syntactic
//! queue), so replacing one never requires position arithmetic over sibling
//! slots.

use std::collections::VecDeque;
use std::rc::Rc;

use either::Either;
use falformal::{Formula, TemporalOp};
use strum::EnumIs;

use crate::error::{EngineError, EngineResult};
use crate::event::{EngineEvent, EventSink, LogSink, StrengthKind};

/// Rebuilds the enclosing formula context around a rewritten subformula.
type Frame = Rc<dyn Fn(Formula) -> Formula>;

/// Syntactically stronger variants of `f`.
///
/// Every returned formula strictly implies `f` on the violation side: a trace
/// falsifying the variant falsifies `f`. Node kinds without a strengthening
/// rule (atomic, `Not`, `Next`, `Bounded`) contribute nothing.
pub fn strengthen(f: &Formula) -> Vec<Formula> {
    match f {
        Formula::Or(a, b) => {
            let mut out = vec![Formula::and((**a).clone(), (**b).clone())];
            for s in strengthen(a) {
                out.push(Formula::or(s, (**b).clone()));
            }
            for s in strengthen(b) {
                out.push(Formula::or((**a).clone(), s));
            }
            out
        }
        Formula::And(a, b) => {
            let mut out = Vec::new();
            for s in strengthen(a) {
                out.push(Formula::and(s, (**b).clone()));
            }
            for s in strengthen(b) {
                out.push(Formula::and((**a).clone(), s));
            }
            out
        }
        Formula::Global(a) => strengthen(a).into_iter().map(Formula::global).collect(),
        Formula::Until(left, right) => vec![
            Formula::and(
                Formula::global((**left).clone()),
                Formula::global((**right).clone()),
            ),
            Formula::and(
                Formula::global((**left).clone()),
                Formula::eventually(Formula::global((**right).clone())),
            ),
            Formula::and(
                Formula::global((**left).clone()),
                Formula::global(Formula::eventually((**right).clone())),
            ),
        ],
        Formula::Eventually(a) => vec![
            Formula::global((**a).clone()),
            Formula::eventually(Formula::global((**a).clone())),
            Formula::global(Formula::eventually((**a).clone())),
        ],
        _ => Vec::new(),
    }
}

/// Locate interval-bearing positions in `f`.
///
/// The walk passes transparently through `Or`, `And` and `Global` (rebuilding
/// the surrounding context into each entry's frame) and terminates at any
/// `Bounded` node or bare `Next` (captured as an implicit `[]_[1,1]`). No
/// entry is created for `Until`.
pub fn find_intervals(f: &Formula) -> Vec<IntervalFrontier> {
    find_intervals_framed(f, Rc::new(|s| s))
}

fn find_intervals_framed(f: &Formula, frame: Frame) -> Vec<IntervalFrontier> {
    match f {
        Formula::Or(a, b) => {
            let mut found = Vec::new();
            {
                let frame = frame.clone();
                let rhs = (**b).clone();
                found.extend(find_intervals_framed(
                    a,
                    Rc::new(move |s| (*frame)(Formula::or(s, rhs.clone()))),
                ));
            }
            {
                let lhs = (**a).clone();
                found.extend(find_intervals_framed(
                    b,
                    Rc::new(move |s| (*frame)(Formula::or(lhs.clone(), s))),
                ));
            }
            found
        }
        Formula::And(a, b) => {
            let mut found = Vec::new();
            {
                let frame = frame.clone();
                let rhs = (**b).clone();
                found.extend(find_intervals_framed(
                    a,
                    Rc::new(move |s| (*frame)(Formula::and(s, rhs.clone()))),
                ));
            }
            {
                let lhs = (**a).clone();
                found.extend(find_intervals_framed(
                    b,
                    Rc::new(move |s| (*frame)(Formula::and(lhs.clone(), s))),
                ));
            }
            found
        }
        Formula::Global(a) => {
            find_intervals_framed(a, Rc::new(move |s| (*frame)(Formula::global(s))))
        }
        Formula::Bounded {
            op,
            from,
            to,
            child,
        } => vec![IntervalFrontier::new(
            *op,
            *from,
            *to,
            (**child).clone(),
            frame,
        )],
        Formula::Next(a) => vec![IntervalFrontier::new(
            TemporalOp::Global,
            1,
            1,
            (**a).clone(),
            frame,
        )],
        _ => Vec::new(),
    }
}

/// Bisection generator for one interval-bearing position.
///
/// Lifecycle: fresh (first request seeds a wide window), emitting (each
/// request halves the remaining slack toward the original bounds), exhausted
/// (no further formula). Every emitted formula is `[]`-rooted; for an
/// `Eventually`-rooted interval the tightest variant is the degenerate
/// zero-width window `[]_[from, from]`, after which the frontier exhausts.
pub struct IntervalFrontier {
    op: TemporalOp,
    inner: Formula,
    frame: Frame,
    default_from: i64,
    default_to: i64,
    current_from: i64,
    current_to: i64,
    assigned: bool,
    done: bool,
}

impl IntervalFrontier {
    fn new(op: TemporalOp, from: usize, to: usize, inner: Formula, frame: Frame) -> Self {
        IntervalFrontier {
            op,
            inner,
            frame,
            default_from: from as i64,
            default_to: to as i64,
            current_from: 0,
            current_to: 15,
            assigned: false,
            done: false,
        }
    }

    /// The initial strengthening: strip the bound to an unbounded `Global`
    /// of the inner formula.
    pub fn strength_init(&self) -> Formula {
        (*self.frame)(Formula::global(self.inner.clone()))
    }

    /// True once the frontier has no further variant to emit.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.done
    }

    fn emit(&self) -> Formula {
        (*self.frame)(Formula::bounded(
            TemporalOp::Global,
            self.current_from as usize,
            self.current_to as usize,
            self.inner.clone(),
        ))
    }

    /// The next strictly tighter variant, or `None` once exhausted.
    pub fn next_strengthened(&mut self) -> Option<Formula> {
        if self.done {
            return None;
        }
        if !self.assigned {
            self.assigned = true;
            match self.op {
                TemporalOp::Global => {
                    self.current_from = self.default_from * 3 / 4;
                    self.current_to = self.default_to + (30 - self.default_to) / 2;
                }
                TemporalOp::Eventually => {
                    self.current_from = self.default_from / 2;
                    self.current_to = self.default_from + (30 - self.default_from) / 2;
                }
            }
            return Some(self.emit());
        }

        // Halve the 'from' slack first.
        if self.current_from < self.default_from && (self.default_from - self.current_from) / 2 > 0
        {
            self.current_from += (self.default_from - self.current_from) / 2;
            return Some(self.emit());
        }

        match self.op {
            TemporalOp::Eventually => {
                if self.current_to <= self.default_from + 1 {
                    // The window collapsed onto 'from': the zero-width
                    // []_[from, from] is the tightest remaining variant.
                    self.done = true;
                    self.current_from = self.default_from;
                    self.current_to = self.default_from;
                    return Some(self.emit());
                }
                self.current_to = self.default_from + (self.current_to - self.default_from) / 2;
                Some(self.emit())
            }
            TemporalOp::Global => {
                if self.current_to <= self.default_to
                    || (self.current_to - self.default_to) / 2 == 0
                {
                    self.done = true;
                    return None;
                }
                self.current_to = self.default_to + (self.current_to - self.default_to) / 2;
                Some(self.emit())
            }
        }
    }
}

/// Lifecycle phase of one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum TargetPhase {
    /// At least one strengthened slot or queued variant remains.
    Active,
    /// All derived state is exhausted; only the raw target is still checked.
    TargetOnly,
    /// The target itself was falsified. Terminal.
    Retired,
}

#[derive(Debug, Clone, Copy)]
enum SlotSource {
    /// Refilled from the interval frontier at this index.
    Interval(usize),
    /// Refilled from the syntactic queue.
    Syntactic,
}

struct Slot {
    formula: Formula,
    source: SlotSource,
}

struct TargetState {
    target: Formula,
    frontier: Vec<IntervalFrontier>,
    queue: VecDeque<Formula>,
    slots: Vec<Slot>,
}

impl TargetState {
    fn new(target: Formula) -> Self {
        let mut queue: VecDeque<Formula> = strengthen(&target).into();
        let frontier = find_intervals(&target);

        let mut slots = Vec::with_capacity(frontier.len() + 1);
        for (j, entry) in frontier.iter().enumerate() {
            slots.push(Slot {
                formula: entry.strength_init(),
                source: SlotSource::Interval(j),
            });
        }
        if let Some(first) = queue.pop_front() {
            slots.push(Slot {
                formula: first,
                source: SlotSource::Syntactic,
            });
        }

        TargetState {
            target,
            frontier,
            queue,
            slots,
        }
    }

    fn phase(&self) -> TargetPhase {
        if self.slots.is_empty() && self.queue.is_empty() {
            TargetPhase::TargetOnly
        } else {
            TargetPhase::Active
        }
    }
}

/// The evolving set of checked formulas, strengthened on falsification
/// feedback.
///
/// The exposed set is the union, over all live targets, of each target's
/// strengthened slots followed by the targets themselves. Callers must
/// serialize [`AdaptiveFormulaSet::notify_falsified`] relative to reads of
/// the exposed set; the structure is exclusively owned by the search loop.
pub struct AdaptiveFormulaSet {
    targets: Vec<TargetState>,
    exposed: Vec<Formula>,
    sink: Box<dyn EventSink>,
}

impl AdaptiveFormulaSet {
    /// Build the engine with the default logging sink.
    pub fn new(targets: Vec<Formula>) -> Self {
        Self::with_sink(targets, Box::new(LogSink))
    }

    pub fn with_sink(targets: Vec<Formula>, sink: Box<dyn EventSink>) -> Self {
        let targets = targets.into_iter().map(TargetState::new).collect();
        let mut set = AdaptiveFormulaSet {
            targets,
            exposed: Vec::new(),
            sink,
        };
        set.recompute_exposed();
        set
    }

    /// The currently exposed checked-formula list.
    #[inline]
    pub fn checked_formulas(&self) -> &[Formula] {
        &self.exposed
    }

    /// True once every target has been falsified.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.targets.is_empty()
    }

    /// Lifecycle phase of `target`; `Retired` if it is no longer (or never
    /// was) a live target.
    pub fn phase(&self, target: &Formula) -> TargetPhase {
        self.targets
            .iter()
            .find(|t| t.target == *target)
            .map_or(TargetPhase::Retired, TargetState::phase)
    }

    fn recompute_exposed(&mut self) {
        self.exposed.clear();
        for t in &self.targets {
            self.exposed.extend(t.slots.iter().map(|s| s.formula.clone()));
        }
        self.exposed.extend(self.targets.iter().map(|t| t.target.clone()));
    }

    /// Process falsification feedback: `indices` reference the currently
    /// exposed list. Falsified targets are retired with all their derived
    /// state; falsified derived formulas are replaced by the next variant of
    /// their refinement stream, or dropped once the stream is exhausted.
    ///
    /// Returns the recomputed exposed list; an empty list signals full
    /// falsification. Out-of-range indices reject the whole call.
    pub fn notify_falsified(&mut self, indices: &[usize]) -> EngineResult<&[Formula]> {
        for &index in indices {
            if index >= self.exposed.len() {
                return Err(EngineError::FalsifiedIndex {
                    index,
                    len: self.exposed.len(),
                });
            }
        }

        // Dedupe while keeping feedback order.
        let mut falsified: Vec<Formula> = Vec::new();
        for &index in indices {
            let f = self.exposed[index].clone();
            if !falsified.contains(&f) {
                falsified.push(f);
            }
        }

        // Split into falsified targets and falsified derived formulas before
        // mutating anything.
        let classified: Vec<Either<Formula, Formula>> = falsified
            .into_iter()
            .map(|f| {
                if self.targets.iter().any(|t| t.target == f) {
                    Either::Left(f)
                } else {
                    Either::Right(f)
                }
            })
            .collect();

        for f in classified.iter().filter_map(|e| e.as_ref().left()) {
            self.sink.emit(&EngineEvent::TargetFalsified {
                formula: f.clone(),
            });
            self.targets.retain(|t| t.target != *f);
            if self.targets.is_empty() {
                self.sink.emit(&EngineEvent::AllFalsified);
                self.exposed.clear();
                return Ok(&self.exposed);
            }
        }

        for f in classified.iter().filter_map(|e| e.as_ref().right()) {
            self.sink.emit(&EngineEvent::DerivedFalsified {
                formula: f.clone(),
            });
            // A derived formula can occur as a slot of several targets;
            // every owner advances its stream.
            for t in &mut self.targets {
                let Some(pos) = t.slots.iter().position(|s| s.formula == *f) else {
                    continue;
                };
                let slot = t.slots.remove(pos);
                let replacement = match slot.source {
                    SlotSource::Interval(j) => t.frontier[j]
                        .next_strengthened()
                        .map(|next| (next, StrengthKind::Interval)),
                    SlotSource::Syntactic => t
                        .queue
                        .pop_front()
                        .map(|next| (next, StrengthKind::Syntactic)),
                };
                match replacement {
                    Some((next, kind)) => {
                        self.sink.emit(&EngineEvent::SlotReplaced {
                            previous: f.clone(),
                            replacement: next.clone(),
                            kind,
                        });
                        t.slots.insert(
                            pos,
                            Slot {
                                formula: next,
                                source: slot.source,
                            },
                        );
                    }
                    None => {
                        self.sink.emit(&EngineEvent::SlotExhausted {
                            formula: f.clone(),
                        });
                    }
                }
            }
        }

        self.recompute_exposed();
        Ok(&self.exposed)
    }
}

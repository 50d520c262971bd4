//! Structured events emitted by the strengthening engine.
//!
//! Role
//! - Keep observability out of the algorithm: the engine reports what
//!   happened to an [`EventSink`] collaborator instead of printing.
//! - [`LogSink`] forwards events to the `log` facade; tests typically install
//!   a recording sink.

use std::fmt;

use falformal::Formula;

/// Which refinement stream produced a replacement formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthKind {
    /// Produced by tightening a temporal-operator interval.
    Interval,
    /// Popped from the precomputed syntactic-strengthening queue.
    Syntactic,
}

/// One observable step of the strengthening engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A user-supplied target was falsified and retired with all its derived
    /// state.
    TargetFalsified { formula: Formula },
    /// A derived (strengthened) formula was falsified.
    DerivedFalsified { formula: Formula },
    /// A falsified slot was refilled with a strictly stronger variant.
    SlotReplaced {
        previous: Formula,
        replacement: Formula,
        kind: StrengthKind,
    },
    /// A falsified slot had no further variants and was dropped.
    SlotExhausted { formula: Formula },
    /// Every target has been falsified; nothing remains to check.
    AllFalsified,
}

impl fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineEvent::TargetFalsified { formula } => {
                write!(f, "target falsified: {formula}")
            }
            EngineEvent::DerivedFalsified { formula } => {
                write!(f, "strengthened formula falsified: {formula}")
            }
            EngineEvent::SlotReplaced {
                previous,
                replacement,
                kind,
            } => {
                let kind = match kind {
                    StrengthKind::Interval => "interval",
                    StrengthKind::Syntactic => "syntactic",
                };
                write!(f, "slot replaced ({kind}): {previous} -> {replacement}")
            }
            EngineEvent::SlotExhausted { formula } => {
                write!(f, "slot exhausted: {formula}")
            }
            EngineEvent::AllFalsified => write!(f, "all targets falsified"),
        }
    }
}

/// Receiver of engine events.
pub trait EventSink {
    fn emit(&mut self, event: &EngineEvent);
}

/// Forward events to the `log` facade at info level.
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: &EngineEvent) {
        log::info!("{event}");
    }
}

/// Discard all events.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &EngineEvent) {}
}

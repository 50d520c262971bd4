//! Falcore: the falsification-side engine around the formula model.
//!
//! The crate wires a black-box system under test into an abstract,
//! finite-alphabet world and keeps the set of checked properties evolving:
//!
//!  - [`sut`]: the adapter contract for the system under test, driven one
//!    concrete input vector at a time.
//!  - [`mapper`]: the bidirectional bridge between concrete numeric vectors
//!    and abstract symbols (Cartesian input table, per-dimension output
//!    bucketing, derived output dimensions).
//!  - [`oracle`]: a membership oracle with a prefix-tree cache, guaranteeing
//!    at most one SUT execution per distinct abstract input word.
//!  - [`adaptive`]: the adaptive strengthening engine. Each target property
//!    exposes strictly stronger derived variants; falsification feedback
//!    replaces a falsified variant with the next one in its refinement
//!    stream until the target itself falls.
//!
//! Engine progress is reported as structured [`event::EngineEvent`]s through
//! an [`event::EventSink`], with a default sink forwarding to the `log`
//! facade.

pub mod adaptive;
pub mod error;
pub mod event;
pub mod mapper;
pub mod oracle;
pub mod sut;

pub mod prelude {
    //! Convenient re-exports for end users.
    pub use crate::adaptive::{strengthen, AdaptiveFormulaSet, TargetPhase};
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::event::{EngineEvent, EventSink, LogSink, NullSink, StrengthKind};
    pub use crate::mapper::{
        InputMap, NoDerivedSignals, OutputMap, SignalMapper, SutMapper, Symbol,
    };
    pub use crate::oracle::CachedMembershipOracle;
    pub use crate::sut::NumericSut;
}

pub use adaptive::{AdaptiveFormulaSet, TargetPhase};
pub use error::{EngineError, EngineResult};
pub use event::{EngineEvent, EventSink};
pub use mapper::{InputMap, OutputMap, SutMapper, Symbol};
pub use oracle::CachedMembershipOracle;
pub use sut::NumericSut;

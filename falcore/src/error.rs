use falformal::FormulaError;
use thiserror::Error;

/// Errors surfaced by the abstraction mapper, the membership oracle, and the
/// strengthening engine.
///
/// Configuration problems (malformed mapper tables, mismatched dimension
/// counts) are detected at construction or on first use and are fatal; SUT
/// failures propagate uncaught so the outer search loop can decide whether to
/// abort or retry.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("output boundaries for dimension {dim} are not strictly ascending at position {position}")]
    NonAscendingBoundaries { dim: usize, position: usize },

    #[error(
        "found {found} output bucket tables for {raw} raw + {derived} derived output dimensions"
    )]
    DimensionMismatch {
        found: usize,
        raw: usize,
        derived: usize,
    },

    #[error("unknown abstract input symbol '{0}'")]
    UnknownSymbol(String),

    #[error("SUT execution failure: {0}")]
    Sut(String),

    #[error("SUT produced an output word of length {got}, expected {expected}")]
    TraceLength { expected: usize, got: usize },

    #[error("falsified index {index} out of range for {len} checked formulas")]
    FalsifiedIndex { index: usize, len: usize },

    #[error(transparent)]
    Formula(#[from] FormulaError),
}

pub type EngineResult<T> = Result<T, EngineError>;

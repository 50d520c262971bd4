//! Discretized input/output traces of a system under test.
//!
//! Role
//! - [`IoSignalPiece`] pairs the concrete input and output vectors of one
//!   time step; robustness evaluation reads the output side, derived-signal
//!   functions may read both.
//! - [`IoTrace`] is the finite word of pieces a formula is evaluated on.

/// Concrete input/output vectors of a single time step.
#[derive(Debug, Clone, PartialEq)]
pub struct IoSignalPiece {
    input: Vec<f64>,
    output: Vec<f64>,
}

impl IoSignalPiece {
    #[inline]
    pub fn new(input: Vec<f64>, output: Vec<f64>) -> Self {
        IoSignalPiece { input, output }
    }

    #[inline]
    pub fn input(&self) -> &[f64] {
        &self.input
    }

    #[inline]
    pub fn output(&self) -> &[f64] {
        &self.output
    }
}

/// Finite discretized trace: one [`IoSignalPiece`] per step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IoTrace {
    pieces: Vec<IoSignalPiece>,
}

impl IoTrace {
    #[inline]
    pub fn new(pieces: Vec<IoSignalPiece>) -> Self {
        IoTrace { pieces }
    }

    /// Build a trace from `(input, output)` pairs.
    pub fn from_steps(steps: Vec<(Vec<f64>, Vec<f64>)>) -> Self {
        IoTrace {
            pieces: steps
                .into_iter()
                .map(|(input, output)| IoSignalPiece::new(input, output))
                .collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// The piece at step `t`, if the trace is that long.
    #[inline]
    pub fn piece(&self, t: usize) -> Option<&IoSignalPiece> {
        self.pieces.get(t)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &IoSignalPiece> {
        self.pieces.iter()
    }
}

//! System-under-test adapter contract.
//!
//! Role
//! - [`NumericSut`] is the seam between the engine and a concrete simulation
//!   or interpretation backend. The adapter is the sole source of concrete
//!   traces; it is driven step by step and may fail at any step.
//!
//! Protocol
//! - `pre()` resets the adapter, `step()` consumes one concrete input vector
//!   and produces the matching output vector (`Ok(None)` signals
//!   end-of-signal), `post()` cleans up. [`NumericSut::execute`] drives the
//!   whole protocol for one input word and fails fast on adapter errors.

use falformal::{IoSignalPiece, IoTrace};

use crate::error::{EngineError, EngineResult};

/// Black-box system consuming concrete input vectors and producing concrete
/// output vectors, one step at a time.
pub trait NumericSut {
    /// Reset the adapter before a fresh execution.
    fn pre(&mut self);

    /// Feed one input vector; `Ok(None)` signals end-of-signal.
    fn step(&mut self, input: &[f64]) -> EngineResult<Option<Vec<f64>>>;

    /// Clean up after an execution, successful or not.
    fn post(&mut self);

    /// Execute a whole input word, producing one output vector per input.
    ///
    /// The adapter is reset first and cleaned up afterwards even on failure.
    /// An execution that ends before the word is exhausted yields
    /// [`EngineError::TraceLength`].
    fn execute(&mut self, word: &[Vec<f64>]) -> EngineResult<IoTrace> {
        self.pre();
        let mut pieces = Vec::with_capacity(word.len());
        for input in word {
            match self.step(input) {
                Ok(Some(output)) => pieces.push(IoSignalPiece::new(input.clone(), output)),
                Ok(None) => break,
                Err(e) => {
                    self.post();
                    return Err(e);
                }
            }
        }
        self.post();

        if pieces.len() != word.len() {
            return Err(EngineError::TraceLength {
                expected: word.len(),
                got: pieces.len(),
            });
        }
        Ok(IoTrace::new(pieces))
    }
}

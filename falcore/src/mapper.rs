//! Bidirectional mapping between concrete numeric vectors and a finite
//! abstract alphabet.
//!
//! Role
//! - [`InputMap`]: one representative concrete vector per abstract input
//!   symbol, built once as the Cartesian product of per-dimension
//!   symbol/value lists.
//! - [`OutputMap`]: per-dimension ascending boundary tables; a concrete
//!   output value is bucketed to the first boundary at or above it, or to a
//!   sentinel "largest" symbol when it exceeds every boundary.
//! - [`SutMapper`] combines both with an optional [`SignalMapper`] computing
//!   derived output dimensions from the concrete input/output pair.
//!
//! Abstraction is lossy by design: only symbol stability is guaranteed, i.e.
//! bucketing the same concrete vector twice yields the same symbol.

use std::collections::HashMap;

use falformal::IoSignalPiece;
use smallvec::SmallVec;

use crate::error::{EngineError, EngineResult};

/// Abstract symbol: one character per signal dimension, concatenated.
pub type Symbol = String;

/// Externally supplied pure function computing derived output dimensions.
pub trait SignalMapper {
    /// Number of derived dimensions.
    fn arity(&self) -> usize;

    /// Value of derived dimension `derived_index` for one I/O step.
    fn apply(&self, derived_index: usize, piece: &IoSignalPiece) -> f64;
}

/// No derived dimensions.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDerivedSignals;

impl SignalMapper for NoDerivedSignals {
    fn arity(&self) -> usize {
        0
    }

    fn apply(&self, _derived_index: usize, _piece: &IoSignalPiece) -> f64 {
        unreachable!("NoDerivedSignals has arity 0")
    }
}

/// Mapping from abstract input symbols to representative concrete vectors.
#[derive(Debug, Clone)]
pub struct InputMap {
    /// Symbols in first-dimension-major construction order.
    alphabet: Vec<Symbol>,
    table: HashMap<Symbol, Vec<f64>>,
    dimensions: usize,
}

impl InputMap {
    /// Build the Cartesian product of per-dimension `(symbol, value)` lists,
    /// concatenating symbols and values in first-dimension-major order.
    pub fn product(per_dimension: &[Vec<(char, f64)>]) -> Self {
        let mut entries: Vec<(Symbol, Vec<f64>)> = vec![(String::new(), Vec::new())];
        for dim in per_dimension {
            let mut next = Vec::with_capacity(entries.len() * dim.len());
            for (symbol, values) in &entries {
                for &(c, v) in dim {
                    let mut symbol = symbol.clone();
                    symbol.push(c);
                    let mut values = values.clone();
                    values.push(v);
                    next.push((symbol, values));
                }
            }
            entries = next;
        }

        let alphabet = entries.iter().map(|(s, _)| s.clone()).collect();
        let table = entries.into_iter().collect();
        InputMap {
            alphabet,
            table,
            dimensions: per_dimension.len(),
        }
    }

    /// The abstract input alphabet, in construction order.
    #[inline]
    pub fn alphabet(&self) -> &[Symbol] {
        &self.alphabet
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The representative concrete vector for `symbol`.
    ///
    /// Unknown symbols are a contract violation of the caller (the search
    /// loop only probes symbols obtained from [`InputMap::alphabet`]), and
    /// are reported as a fatal mapping error.
    pub fn concretize(&self, symbol: &str) -> EngineResult<&[f64]> {
        self.table
            .get(symbol)
            .map(Vec::as_slice)
            .ok_or_else(|| EngineError::UnknownSymbol(symbol.to_string()))
    }

    /// Concretize a whole abstract word.
    pub fn concretize_word(&self, word: &[Symbol]) -> EngineResult<Vec<Vec<f64>>> {
        word.iter()
            .map(|s| self.concretize(s).map(<[f64]>::to_vec))
            .collect()
    }
}

/// Ascending bucket table for one output dimension.
#[derive(Debug, Clone)]
struct OutputBuckets {
    symbols: Vec<char>,
    boundaries: Vec<f64>,
    /// Sentinel for values above every boundary.
    largest: char,
}

/// Per-dimension bucket tables for abstracting concrete outputs.
#[derive(Debug, Clone)]
pub struct OutputMap {
    dims: Vec<OutputBuckets>,
}

impl OutputMap {
    /// Build bucket tables from per-dimension boundary lists.
    ///
    /// Boundaries must be strictly ascending; symbols are assigned `'a'..`
    /// in boundary order, and the next character becomes the sentinel.
    pub fn from_boundaries(per_dimension: &[Vec<f64>]) -> EngineResult<Self> {
        let mut dims = Vec::with_capacity(per_dimension.len());
        for (dim, boundaries) in per_dimension.iter().enumerate() {
            for position in 1..boundaries.len() {
                if boundaries[position - 1] >= boundaries[position] {
                    return Err(EngineError::NonAscendingBoundaries { dim, position });
                }
            }
            debug_assert!(boundaries.len() < 26, "bucket symbols are single letters");
            let symbols: Vec<char> = (0..boundaries.len())
                .map(|i| (b'a' + i as u8) as char)
                .collect();
            let largest = (b'a' + boundaries.len() as u8) as char;
            dims.push(OutputBuckets {
                symbols,
                boundaries: boundaries.clone(),
                largest,
            });
        }
        Ok(OutputMap { dims })
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dims.len()
    }

    /// The symbol of the first boundary at or above `value`, or the sentinel
    /// if `value` exceeds every boundary. Monotone in `value`.
    pub fn bucket_of(&self, dim: usize, value: f64) -> char {
        let buckets = &self.dims[dim];
        let index = buckets.boundaries.partition_point(|&b| b < value);
        if index < buckets.symbols.len() {
            buckets.symbols[index]
        } else {
            buckets.largest
        }
    }
}

/// Combined mapper between the SUT's concrete signals and the abstract
/// alphabet, including derived output dimensions.
#[derive(Debug, Clone)]
pub struct SutMapper<S: SignalMapper> {
    input: InputMap,
    output: OutputMap,
    derived: S,
}

impl<S: SignalMapper> SutMapper<S> {
    pub fn new(input: InputMap, output: OutputMap, derived: S) -> Self {
        SutMapper {
            input,
            output,
            derived,
        }
    }

    #[inline]
    pub fn input(&self) -> &InputMap {
        &self.input
    }

    #[inline]
    pub fn output(&self) -> &OutputMap {
        &self.output
    }

    /// Concrete output vector extended with the derived dimensions.
    pub fn concrete_output(&self, piece: &IoSignalPiece) -> Vec<f64> {
        let mut extended = piece.output().to_vec();
        for i in 0..self.derived.arity() {
            extended.push(self.derived.apply(i, piece));
        }
        extended
    }

    /// Bucket every output dimension (raw, then derived) of one I/O step into
    /// the abstract output symbol.
    pub fn abstract_output(&self, piece: &IoSignalPiece) -> EngineResult<Symbol> {
        let raw = piece.output();
        let total = self.output.dimensions();
        if total != raw.len() + self.derived.arity() {
            return Err(EngineError::DimensionMismatch {
                found: total,
                raw: raw.len(),
                derived: self.derived.arity(),
            });
        }

        // Extend in a small inline buffer; output arities are tiny.
        let mut values: SmallVec<f64, 8> = SmallVec::new();
        values.extend(raw.iter().copied());
        for i in 0..self.derived.arity() {
            values.push(self.derived.apply(i, piece));
        }

        let mut symbol = String::with_capacity(total);
        for (i, &value) in values.iter().enumerate() {
            symbol.push(self.output.bucket_of(i, value));
        }
        Ok(symbol)
    }
}

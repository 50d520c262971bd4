//! Cached membership oracle: "what output word results from this abstract
//! input word".
//!
//! Role
//! - Answer membership queries for the external learning loop while keeping
//!   SUT executions to the bare minimum: for a fixed abstract input word the
//!   SUT is invoked at most once across the oracle's lifetime.
//! - The cache is a prefix tree over abstract input symbols; it grows
//!   monotonically and never evicts, so shared prefixes are stored once.
//!
//! Failure
//! - If the SUT adapter fails, nothing is cached for the failing word and the
//!   error propagates to the caller.

use std::collections::HashMap;

use falformal::{IoSignalPiece, IoTrace};

use crate::error::EngineResult;
use crate::mapper::{SignalMapper, SutMapper, Symbol};
use crate::sut::NumericSut;

#[derive(Debug, Default)]
struct CacheNode {
    children: HashMap<Symbol, CacheEdge>,
}

#[derive(Debug)]
struct CacheEdge {
    /// Abstract output symbol produced at this step.
    output: Symbol,
    /// Concrete output vector (raw plus derived dimensions) at this step.
    concrete: Vec<f64>,
    next: CacheNode,
}

/// Membership oracle backed by a SUT adapter and a prefix-tree cache.
pub struct CachedMembershipOracle<T: NumericSut, S: SignalMapper> {
    sut: T,
    mapper: SutMapper<S>,
    root: CacheNode,
    sut_executions: usize,
}

impl<T: NumericSut, S: SignalMapper> CachedMembershipOracle<T, S> {
    pub fn new(sut: T, mapper: SutMapper<S>) -> Self {
        CachedMembershipOracle {
            sut,
            mapper,
            root: CacheNode::default(),
            sut_executions: 0,
        }
    }

    #[inline]
    pub fn mapper(&self) -> &SutMapper<S> {
        &self.mapper
    }

    /// How many times the SUT adapter has actually been executed.
    #[inline]
    pub fn sut_executions(&self) -> usize {
        self.sut_executions
    }

    /// Answer a membership query: the trailing `suffix_len` symbols of the
    /// abstract output word for `word`.
    pub fn answer(&mut self, word: &[Symbol], suffix_len: usize) -> EngineResult<Vec<Symbol>> {
        assert!(
            suffix_len <= word.len(),
            "requested suffix longer than the query word"
        );
        let (outputs, _) = self.ensure_cached(word)?;
        Ok(outputs[outputs.len() - suffix_len..].to_vec())
    }

    /// The concrete trace for `word`, with outputs extended by the derived
    /// dimensions; served from cache whenever possible.
    pub fn concrete_trace(&mut self, word: &[Symbol]) -> EngineResult<IoTrace> {
        let (_, concretes) = self.ensure_cached(word)?;
        let inputs = self.mapper.input().concretize_word(word)?;
        Ok(IoTrace::new(
            inputs
                .into_iter()
                .zip(concretes)
                .map(|(input, output)| IoSignalPiece::new(input, output))
                .collect(),
        ))
    }

    fn lookup(&self, word: &[Symbol]) -> Option<(Vec<Symbol>, Vec<Vec<f64>>)> {
        let mut node = &self.root;
        let mut outputs = Vec::with_capacity(word.len());
        let mut concretes = Vec::with_capacity(word.len());
        for symbol in word {
            let edge = node.children.get(symbol)?;
            outputs.push(edge.output.clone());
            concretes.push(edge.concrete.clone());
            node = &edge.next;
        }
        Some((outputs, concretes))
    }

    fn insert(&mut self, word: &[Symbol], outputs: &[Symbol], concretes: &[Vec<f64>]) {
        let mut node = &mut self.root;
        for ((symbol, output), concrete) in word.iter().zip(outputs).zip(concretes) {
            let edge = node
                .children
                .entry(symbol.clone())
                .or_insert_with(|| CacheEdge {
                    output: output.clone(),
                    concrete: concrete.clone(),
                    next: CacheNode::default(),
                });
            node = &mut edge.next;
        }
    }

    fn ensure_cached(&mut self, word: &[Symbol]) -> EngineResult<(Vec<Symbol>, Vec<Vec<f64>>)> {
        if let Some(cached) = self.lookup(word) {
            log::trace!("membership cache hit for word of length {}", word.len());
            return Ok(cached);
        }

        log::trace!("membership cache miss for word of length {}", word.len());
        let concrete_inputs = self.mapper.input().concretize_word(word)?;
        let trace = self.sut.execute(&concrete_inputs)?;
        self.sut_executions += 1;

        let mut outputs = Vec::with_capacity(trace.len());
        let mut concretes = Vec::with_capacity(trace.len());
        for piece in trace.iter() {
            outputs.push(self.mapper.abstract_output(piece)?);
            concretes.push(self.mapper.concrete_output(piece));
        }
        self.insert(word, &outputs, &concretes);
        Ok((outputs, concretes))
    }
}

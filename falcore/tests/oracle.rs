use falcore::error::{EngineError, EngineResult};
use falcore::mapper::{InputMap, NoDerivedSignals, OutputMap, SutMapper};
use falcore::oracle::CachedMembershipOracle;
use falcore::sut::NumericSut;
use falformal::IoTrace;

/// Doubles its single input dimension; optionally fails the first few
/// executions.
struct Doubler {
    fail_remaining: usize,
    failing_run: bool,
}

impl Doubler {
    fn new() -> Self {
        Doubler {
            fail_remaining: 0,
            failing_run: false,
        }
    }

    fn failing_first(n: usize) -> Self {
        Doubler {
            fail_remaining: n,
            failing_run: false,
        }
    }
}

impl NumericSut for Doubler {
    fn pre(&mut self) {
        self.failing_run = self.fail_remaining > 0;
        self.fail_remaining = self.fail_remaining.saturating_sub(1);
    }

    fn step(&mut self, input: &[f64]) -> EngineResult<Option<Vec<f64>>> {
        if self.failing_run {
            return Err(EngineError::Sut("simulator crashed".to_string()));
        }
        Ok(Some(vec![input[0] * 2.0]))
    }

    fn post(&mut self) {}
}

fn mapper() -> SutMapper<NoDerivedSignals> {
    SutMapper::new(
        InputMap::product(&[vec![('a', 1.0), ('b', 2.0)]]),
        // 2.0 buckets to 'a', 4.0 to the sentinel 'b'.
        OutputMap::from_boundaries(&[vec![3.0]]).unwrap(),
        NoDerivedSignals,
    )
}

fn word(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

#[test]
fn repeated_query_executes_the_sut_once() {
    let mut oracle = CachedMembershipOracle::new(Doubler::new(), mapper());
    let w = word(&["a", "b", "a"]);

    let first = oracle.answer(&w, 3).unwrap();
    let second = oracle.answer(&w, 3).unwrap();

    assert_eq!(first, word(&["a", "b", "a"]));
    assert_eq!(first, second);
    assert_eq!(oracle.sut_executions(), 1);
}

#[test]
fn answer_returns_the_trailing_suffix() {
    let mut oracle = CachedMembershipOracle::new(Doubler::new(), mapper());

    let suffix = oracle.answer(&word(&["a", "a", "b"]), 1).unwrap();
    assert_eq!(suffix, word(&["b"]));

    let empty = oracle.answer(&word(&["a"]), 0).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn cached_prefixes_are_shared_but_extensions_re_execute() {
    let mut oracle = CachedMembershipOracle::new(Doubler::new(), mapper());

    oracle.answer(&word(&["a"]), 1).unwrap();
    assert_eq!(oracle.sut_executions(), 1);

    // The extension misses the cache and runs the SUT once more.
    oracle.answer(&word(&["a", "b"]), 2).unwrap();
    assert_eq!(oracle.sut_executions(), 2);

    // The original prefix is still served from the cache.
    oracle.answer(&word(&["a"]), 1).unwrap();
    assert_eq!(oracle.sut_executions(), 2);
}

#[test]
fn concrete_trace_carries_inputs_and_outputs() {
    let mut oracle = CachedMembershipOracle::new(Doubler::new(), mapper());

    let trace: IoTrace = oracle.concrete_trace(&word(&["b", "a"])).unwrap();
    assert_eq!(trace.len(), 2);
    assert_eq!(trace.piece(0).unwrap().input(), &[2.0]);
    assert_eq!(trace.piece(0).unwrap().output(), &[4.0]);
    assert_eq!(trace.piece(1).unwrap().input(), &[1.0]);
    assert_eq!(trace.piece(1).unwrap().output(), &[2.0]);

    // Served from the same cache as membership answers.
    oracle.answer(&word(&["b", "a"]), 2).unwrap();
    assert_eq!(oracle.sut_executions(), 1);
}

#[test]
fn failed_executions_are_not_cached() {
    let mut oracle = CachedMembershipOracle::new(Doubler::failing_first(1), mapper());
    let w = word(&["a", "b"]);

    assert!(matches!(oracle.answer(&w, 2), Err(EngineError::Sut(_))));
    assert_eq!(oracle.sut_executions(), 0);

    // The retry reaches the now-healthy SUT and caches normally.
    assert_eq!(oracle.answer(&w, 2).unwrap(), word(&["a", "b"]));
    assert_eq!(oracle.sut_executions(), 1);
    oracle.answer(&w, 2).unwrap();
    assert_eq!(oracle.sut_executions(), 1);
}

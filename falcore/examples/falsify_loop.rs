//! End-to-end falsification loop against a toy vehicle model.
//!
//! A first-order speed model is driven by abstract throttle symbols; the
//! engine keeps a set of checked formulas that tighten every time the random
//! search falsifies one of them, until the target property itself falls.

use falcore::prelude::*;
use falformal::prelude::*;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// speed' = speed + 0.5 * (throttle - drag * speed)
struct Vehicle {
    speed: f64,
}

impl NumericSut for Vehicle {
    fn pre(&mut self) {
        self.speed = 0.0;
    }

    fn step(&mut self, input: &[f64]) -> EngineResult<Option<Vec<f64>>> {
        let throttle = input[0];
        self.speed += 0.5 * (throttle - 0.1 * self.speed);
        Ok(Some(vec![self.speed]))
    }

    fn post(&mut self) {}
}

fn main() -> EngineResult<()> {
    let mapper = SutMapper::new(
        InputMap::product(&[vec![('l', 0.0), ('m', 4.0), ('h', 10.0)]]),
        OutputMap::from_boundaries(&[vec![5.0, 12.0]])?,
        NoDerivedSignals,
    );
    let alphabet: Vec<Symbol> = mapper.input().alphabet().to_vec();
    let mut oracle = CachedMembershipOracle::new(Vehicle { speed: 0.0 }, mapper);

    // Signal 0 is the speed output. The target claims the speed stays below
    // 12 over the whole window; full throttle falsifies it.
    let target = Formula::bounded(
        TemporalOp::Global,
        2,
        6,
        Formula::atomic(0, ComparisonOp::Less, 12.0),
    );
    let mut set = AdaptiveFormulaSet::new(vec![target.clone()]);

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let horizon = 8;

    for trial in 0.. {
        if set.is_done() {
            println!("all targets falsified after {trial} trials");
            break;
        }

        let word: Vec<Symbol> = (0..horizon)
            .map(|_| alphabet.choose(&mut rng).cloned().unwrap_or_default())
            .collect();
        let trace = oracle.concrete_trace(&word)?;

        let mut falsified = Vec::new();
        for (index, formula) in set.checked_formulas().iter().enumerate() {
            if formula.robustness(&trace, 0)?.is_violated() {
                falsified.push(index);
            }
        }
        if falsified.is_empty() {
            continue;
        }

        for &index in &falsified {
            println!("trial {trial}: falsified {}", set.checked_formulas()[index]);
        }
        set.notify_falsified(&falsified)?;
        println!("target phase: {:?}", set.phase(&target));
    }

    println!("distinct simulations: {}", oracle.sut_executions());
    Ok(())
}

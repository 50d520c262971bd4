use std::cell::RefCell;
use std::rc::Rc;

use falcore::adaptive::{find_intervals, strengthen, AdaptiveFormulaSet};
use falcore::error::EngineError;
use falcore::event::{EngineEvent, EventSink, StrengthKind};
use falformal::{ComparisonOp, Formula, TemporalOp};

fn p() -> Formula {
    Formula::atomic(0, ComparisonOp::Less, 10.0)
}

fn q() -> Formula {
    Formula::atomic(1, ComparisonOp::Greater, 2.0)
}

struct RecordingSink(Rc<RefCell<Vec<EngineEvent>>>);

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &EngineEvent) {
        self.0.borrow_mut().push(event.clone());
    }
}

fn recording_set(targets: Vec<Formula>) -> (AdaptiveFormulaSet, Rc<RefCell<Vec<EngineEvent>>>) {
    let events = Rc::new(RefCell::new(Vec::new()));
    let set = AdaptiveFormulaSet::with_sink(targets, Box::new(RecordingSink(events.clone())));
    (set, events)
}

#[test]
fn eventually_strengthens_in_fixed_order() {
    let variants = strengthen(&Formula::eventually(p()));
    assert_eq!(
        variants,
        vec![
            Formula::global(p()),
            Formula::eventually(Formula::global(p())),
            Formula::global(Formula::eventually(p())),
        ]
    );
}

#[test]
fn disjunction_strengthens_to_conjunction_first() {
    let variants = strengthen(&(p() | q()));
    assert_eq!(variants, vec![p() & q()]);
}

#[test]
fn until_strengthens_to_three_conjunctions() {
    let variants = strengthen(&Formula::until(p(), q()));
    assert_eq!(
        variants,
        vec![
            Formula::global(p()) & Formula::global(q()),
            Formula::global(p()) & Formula::eventually(Formula::global(q())),
            Formula::global(p()) & Formula::global(Formula::eventually(q())),
        ]
    );
}

#[test]
fn atomic_and_bounded_have_no_syntactic_variants() {
    assert!(strengthen(&p()).is_empty());
    assert!(strengthen(&Formula::bounded(TemporalOp::Global, 4, 8, p())).is_empty());
}

#[test]
fn bounded_global_bisection_tightens_and_terminates() {
    let mut frontier = find_intervals(&Formula::bounded(TemporalOp::Global, 4, 8, p()));
    assert_eq!(frontier.len(), 1);
    let frontier = &mut frontier[0];

    assert_eq!(frontier.strength_init(), Formula::global(p()));

    let mut seen = Vec::new();
    while let Some(f) = frontier.next_strengthened() {
        seen.push(f.to_string());
    }
    assert_eq!(
        seen,
        vec![
            "[]_[3, 19] ( signal(0) < 10 )",
            "[]_[3, 13] ( signal(0) < 10 )",
            "[]_[3, 10] ( signal(0) < 10 )",
            "[]_[3, 9] ( signal(0) < 10 )",
        ]
    );
    assert!(frontier.is_exhausted());
    assert!(frontier.next_strengthened().is_none());
}

#[test]
fn eventually_bisection_ends_with_the_zero_width_window() {
    let mut frontier = find_intervals(&Formula::bounded(TemporalOp::Eventually, 4, 8, p()));
    assert_eq!(frontier.len(), 1);
    let frontier = &mut frontier[0];

    // Even an Eventually interval strengthens to Global-rooted windows.
    assert_eq!(frontier.strength_init(), Formula::global(p()));

    let mut seen = Vec::new();
    while let Some(f) = frontier.next_strengthened() {
        seen.push(f.to_string());
    }
    assert_eq!(
        seen,
        vec![
            "[]_[2, 17] ( signal(0) < 10 )",
            "[]_[3, 17] ( signal(0) < 10 )",
            "[]_[3, 10] ( signal(0) < 10 )",
            "[]_[3, 7] ( signal(0) < 10 )",
            "[]_[3, 5] ( signal(0) < 10 )",
            "[]_[4, 4] ( signal(0) < 10 )",
        ]
    );
    assert!(frontier.next_strengthened().is_none());
}

#[test]
fn next_is_treated_as_a_unit_window() {
    let mut frontier = find_intervals(&Formula::next(p()));
    assert_eq!(frontier.len(), 1);
    assert_eq!(frontier[0].strength_init(), Formula::global(p()));
    assert_eq!(
        frontier[0].next_strengthened().unwrap().to_string(),
        "[]_[0, 15] ( signal(0) < 10 )"
    );
}

#[test]
fn interval_slots_are_rebuilt_inside_their_context() {
    let target = Formula::bounded(TemporalOp::Global, 4, 8, p()) | q();
    let mut set = AdaptiveFormulaSet::new(vec![target.clone()]);

    // One interval slot (unbounded init), one syntactic slot, plus the target.
    assert_eq!(
        set.checked_formulas(),
        [
            Formula::global(p()) | q(),
            Formula::bounded(TemporalOp::Global, 4, 8, p()) & q(),
            target.clone(),
        ]
    );

    // Falsifying the interval slot advances its bisection in place.
    let exposed = set.notify_falsified(&[0]).unwrap();
    assert_eq!(
        exposed[0],
        Formula::bounded(TemporalOp::Global, 3, 19, p()) | q()
    );
    assert_eq!(exposed.len(), 3);
    assert_eq!(exposed[2], target);
}

#[test]
fn syntactic_slot_pops_the_queue_until_exhausted() {
    let target = Formula::eventually(p());
    let (mut set, events) = recording_set(vec![target.clone()]);

    assert_eq!(
        set.checked_formulas(),
        [Formula::global(p()), target.clone()]
    );
    assert!(set.phase(&target).is_active());

    let exposed = set.notify_falsified(&[0]).unwrap();
    assert_eq!(exposed[0], Formula::eventually(Formula::global(p())));

    let exposed = set.notify_falsified(&[0]).unwrap();
    assert_eq!(exposed[0], Formula::global(Formula::eventually(p())));

    // Queue exhausted: the slot is dropped and only the target remains.
    let exposed = set.notify_falsified(&[0]).unwrap();
    assert_eq!(exposed, [target.clone()]);
    assert!(set.phase(&target).is_target_only());

    let replaced = events
        .borrow()
        .iter()
        .filter(|e| matches!(e, EngineEvent::SlotReplaced { kind: StrengthKind::Syntactic, .. }))
        .count();
    assert_eq!(replaced, 2);
    assert!(events
        .borrow()
        .iter()
        .any(|e| matches!(e, EngineEvent::SlotExhausted { .. })));
}

#[test]
fn falsified_target_retires_with_its_derived_state() {
    let first = p() | q();
    let second = Formula::eventually(q());
    let (mut set, events) = recording_set(vec![first.clone(), second.clone()]);
    assert_eq!(set.checked_formulas().len(), 4);

    // Index 3 is the second target; its derived slot disappears with it.
    let exposed = set.notify_falsified(&[3]).unwrap().to_vec();
    assert_eq!(exposed, [p() & q(), first.clone()]);
    assert!(set.phase(&second).is_retired());
    assert!(set.phase(&first).is_active());
    assert!(!set.is_done());

    // Retiring the last target empties the set.
    let exposed = set.notify_falsified(&[1]).unwrap();
    assert!(exposed.is_empty());
    assert!(set.is_done());
    assert_eq!(
        *events.borrow().last().unwrap(),
        EngineEvent::AllFalsified
    );
}

#[test]
fn target_and_derived_in_the_same_batch() {
    let first = p() | q();
    let second = Formula::eventually(q());
    let mut set = AdaptiveFormulaSet::new(vec![first.clone(), second.clone()]);
    // Exposed: [p && q, [] q, p || q, <> q].

    // Falsify the first target and the second target's derived slot at once.
    let exposed = set.notify_falsified(&[2, 1]).unwrap();
    assert_eq!(
        exposed,
        [
            Formula::eventually(Formula::global(q())),
            second.clone(),
        ]
    );
    assert!(set.phase(&first).is_retired());
}

#[test]
fn duplicate_indices_advance_the_stream_once() {
    let target = Formula::eventually(p());
    let mut set = AdaptiveFormulaSet::new(vec![target.clone()]);

    let exposed = set.notify_falsified(&[0, 0]).unwrap();
    assert_eq!(exposed[0], Formula::eventually(Formula::global(p())));
}

#[test]
fn out_of_range_indices_reject_the_whole_call() {
    let mut set = AdaptiveFormulaSet::new(vec![p() | q()]);
    let before = set.checked_formulas().to_vec();

    assert!(matches!(
        set.notify_falsified(&[0, 7]),
        Err(EngineError::FalsifiedIndex { index: 7, len: 2 })
    ));
    assert_eq!(set.checked_formulas(), before);
}

#[test]
fn unknown_formulas_are_retired() {
    let set = AdaptiveFormulaSet::new(vec![p() | q()]);
    assert!(set.phase(&Formula::global(p())).is_retired());
}

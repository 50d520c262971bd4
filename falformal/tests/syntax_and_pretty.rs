use falformal::prelude::*;

fn p() -> Formula {
    Formula::atomic(0, ComparisonOp::Less, 10.0)
}

fn q() -> Formula {
    Formula::atomic(1, ComparisonOp::Greater, 2.0)
}

#[test]
fn canonical_form_is_fully_parenthesized() {
    assert_eq!(p().to_string(), "signal(0) < 10");
    assert_eq!(
        Formula::and(p(), q()).to_string(),
        "( signal(0) < 10 ) && ( signal(1) > 2 )"
    );
    assert_eq!(Formula::global(p()).to_string(), "[] ( signal(0) < 10 )");
    assert_eq!(
        Formula::bounded(TemporalOp::Eventually, 1, 4, p()).to_string(),
        "<>_[1, 4] ( signal(0) < 10 )"
    );
    assert_eq!(
        Formula::until(p(), q()).to_string(),
        "( signal(0) < 10 ) U ( signal(1) > 2 )"
    );
    assert_eq!(Formula::next(p()).to_string(), "X ( signal(0) < 10 )");
}

#[test]
fn syntax_string_matches_display() {
    let f = Formula::or(Formula::not(p()), Formula::eventually(q()));
    assert_eq!(f.syntax_string(), f.to_string());
}

#[test]
fn pretty_rendering_is_minimally_parenthesized() {
    // Same-connective chains need no parentheses.
    let f = Formula::and(Formula::and(p(), q()), p());
    assert_eq!(
        f.pretty_string(),
        "signal(0) < 10 && signal(1) > 2 && signal(0) < 10"
    );

    // A disjunction under a conjunction keeps its grouping visible.
    let f = Formula::and(Formula::or(p(), q()), p());
    assert_eq!(
        f.pretty_string(),
        "(signal(0) < 10 || signal(1) > 2) && signal(0) < 10"
    );
}

#[test]
fn pretty_rendering_of_temporal_operators() {
    let f = Formula::global(Formula::or(p(), q()));
    assert_eq!(
        f.pretty_string(),
        "[] (signal(0) < 10 || signal(1) > 2)"
    );

    let f = Formula::bounded(TemporalOp::Global, 0, 3, p());
    assert_eq!(f.pretty_string(), "[]_[0, 3] signal(0) < 10");
}

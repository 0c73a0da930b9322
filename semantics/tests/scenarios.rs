// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! End-to-end evaluation of small models from the literature, and properties
//! every model should have.

use fol::signature::Signature;
use fol::syntax::{Formula, Term};
use itertools::Itertools;
use semantics::model::domain;
use semantics::trace::{Phase, TraceLog};
use semantics::*;
use test_log::test;

fn var(x: &str) -> Term {
    Term::var(x)
}

fn pred1(p: &str, t: Term) -> Formula {
    Formula::pred(p, [t])
}

fn empty() -> Assignment {
    Assignment::new()
}

fn assign(pairs: &[(&str, &str)]) -> Assignment {
    pairs
        .iter()
        .map(|(x, d)| (x.to_string(), d.to_string()))
        .collect()
}

fn no_pairs() -> Vec<(&'static str, &'static str)> {
    vec![]
}

fn tupperware() -> Model {
    let sig = Signature::new()
        .predicate("box", 1)
        .predicate("lid", 1)
        .predicate("fit", 2);
    let interp = Interpretation::new()
        .predicate("box", 1, [["rectbox"], ["roundbox"]])
        .predicate("lid", 1, [["rectlid"], ["roundlid"]])
        .predicate("fit", 2, [["rectlid", "rectbox"], ["roundlid", "roundbox"]]);
    ClassicalModel::new(
        &sig,
        domain(["rectbox", "rectlid", "roundlid", "bunny", "roundbox"]),
        interp,
    )
    .unwrap()
    .into()
}

#[test]
fn tupperware_every_box_has_a_lid() {
    let model = tupperware();
    let every_box_has_a_lid = Formula::forall(
        "x",
        Formula::implies(
            pred1("box", var("x")),
            Formula::exists(
                "y",
                Formula::and(
                    pred1("lid", var("y")),
                    Formula::pred("fit", [var("y"), var("x")]),
                ),
            ),
        ),
    );
    let one_lid_fits_all = Formula::exists(
        "y",
        Formula::and(
            pred1("lid", var("y")),
            Formula::forall(
                "x",
                Formula::implies(
                    pred1("box", var("x")),
                    Formula::pred("fit", [var("y"), var("x")]),
                ),
            ),
        ),
    );
    assert_eq!(denote(&every_box_has_a_lid, &model, &empty(), None), Ok(true));
    assert_eq!(denote(&one_lid_fits_all, &model, &empty(), None), Ok(false));
    assert_eq!(true_in_model(&every_box_has_a_lid, &model), Ok(true));
    assert_eq!(true_in_model(&one_lid_fits_all, &model), Ok(false));
}

fn reading() -> Model {
    let sig = Signature::new()
        .constant("m")
        .constant("MMiL")
        .predicate("student", 1)
        .predicate("book", 1)
        .predicate("read", 2);
    let interp = Interpretation::new()
        .constant("m", "Mary")
        .constant("MMiL", "MMiL")
        .predicate("student", 1, [["Jane"], ["Mary"]])
        .predicate("book", 1, [["MMiL"]])
        .predicate("read", 2, [["Mary", "MMiL"]]);
    ClassicalModel::new(&sig, domain(["Mary", "Jane", "MMiL"]), interp)
        .unwrap()
        .into()
}

#[test]
fn reading_mary_read_a_book() {
    let model = reading();
    let mary_read_a_book = Formula::exists(
        "x",
        Formula::and(
            pred1("book", var("x")),
            Formula::pred("read", [Term::constant("m"), var("x")]),
        ),
    );
    assert_eq!(true_in_model(&mary_read_a_book, &model), Ok(true));

    let every_student_read_mmil = Formula::forall(
        "y",
        Formula::implies(
            pred1("student", var("y")),
            Formula::exists(
                "x",
                Formula::and(
                    pred1("book", var("x")),
                    Formula::pred("read", [var("y"), Term::constant("MMiL")]),
                ),
            ),
        ),
    );
    assert_eq!(true_in_model(&every_student_read_mmil, &model), Ok(false));

    // Jane is the student who fails
    let body = Formula::implies(
        pred1("student", var("y")),
        Formula::pred("read", [var("y"), Term::constant("MMiL")]),
    );
    let cex = counterexample(&body, &model).unwrap().unwrap();
    assert_eq!(cex.assignment, assign(&[("y", "Jane")]));
}

fn excluded_middle() -> Model {
    let sig = Signature::new().atom("p");
    let frame = Frame::new(["k0", "k1"], [("k0", "k1")]).unwrap();
    KripkeModel::new(
        &sig,
        frame,
        [("k0", domain(["a"])), ("k1", domain(["a"]))],
        [
            ("k0", Interpretation::new().atom("p", false)),
            ("k1", Interpretation::new().atom("p", true)),
        ],
    )
    .unwrap()
    .into()
}

#[test]
fn intuitionistic_excluded_middle_fails() {
    let model = excluded_middle();
    let p = Formula::atom("p");
    let lem = Formula::or(&p, Formula::not(&p));
    let dne = Formula::implies(Formula::not(Formula::not(&p)), &p);
    let not_not_lem = Formula::not(Formula::not(&lem));
    assert_eq!(denote(&lem, &model, &empty(), Some("k0")), Ok(false));
    assert_eq!(denote(&dne, &model, &empty(), Some("k0")), Ok(false));
    assert_eq!(denote(&not_not_lem, &model, &empty(), Some("k0")), Ok(true));
    assert_eq!(true_in_model(&lem, &model), Ok(false));
    assert_eq!(true_in_model(&not_not_lem, &model), Ok(true));
}

#[test]
fn modal_box_does_not_distribute_over_or() {
    let sig = Signature::new().predicate("P", 0);
    let frame = Frame::new(
        ["w1", "w2"],
        [("w1", "w1"), ("w1", "w2"), ("w2", "w2")],
    )
    .unwrap();
    let model: Model = ModalModel::new(
        &sig,
        frame,
        domain(["a"]),
        [
            ("w1", Interpretation::new().nullary("P", true)),
            ("w2", Interpretation::new().nullary("P", false)),
        ],
    )
    .unwrap()
    .into();
    let p = Formula::pred("P", Vec::<Term>::new());
    let not_p = Formula::not(&p);
    let box_lem = Formula::necessarily(Formula::or(&p, &not_p));
    let lem_box = Formula::or(Formula::necessarily(&p), Formula::necessarily(&not_p));
    assert_eq!(denote(&box_lem, &model, &empty(), Some("w1")), Ok(true));
    assert_eq!(denote(&lem_box, &model, &empty(), Some("w1")), Ok(false));
    assert_eq!(true_in_model(&box_lem, &model), Ok(true));
}

#[test]
fn varying_domain_distinct_elements() {
    let frame = Frame::new(
        ["w1", "w2"],
        [("w1", "w1"), ("w1", "w2"), ("w2", "w2")],
    )
    .unwrap();
    let model: Model = VaryingModel::new(
        &Signature::new(),
        frame,
        [("w1", domain(["a"])), ("w2", domain(["a", "b"]))],
        [("w1", Interpretation::new()), ("w2", Interpretation::new())],
    )
    .unwrap()
    .into();
    let two_things = Formula::exists_many(&["x", "y"], Formula::not_equals(var("x"), var("y")));
    assert_eq!(denote(&two_things, &model, &empty(), Some("w1")), Ok(false));
    assert_eq!(denote(&two_things, &model, &empty(), Some("w2")), Ok(true));
    assert_eq!(
        denote(&Formula::possibly(&two_things), &model, &empty(), Some("w1")),
        Ok(true)
    );
    assert_eq!(true_in_model(&two_things, &model), Ok(false));
}

fn family() -> Model {
    let sig = Signature::new()
        .constant("Peter")
        .constant("Mary")
        .constant("Susan")
        .constant("Jane")
        .function("mother", 1);
    let interp = Interpretation::new()
        .constant("Peter", "Peter")
        .constant("Mary", "Mary")
        .constant("Susan", "Susan")
        .constant("Jane", "Jane")
        .function(
            "mother",
            1,
            [(["Mary"], "Susan"), (["Peter"], "Susan"), (["Susan"], "Jane")],
        );
    ClassicalModel::new(&sig, domain(["Peter", "Mary", "Susan", "Jane"]), interp)
        .unwrap()
        .into()
}

#[test]
fn function_terms() {
    let model = family();
    let mother = |t: Term| Term::app("mother", [t]);
    let mary = Term::constant("Mary");
    assert_eq!(
        denote_term(&mother(mother(mary.clone())), &model, &empty(), None),
        Ok("Jane".to_string())
    );
    assert_eq!(
        denote(
            &Formula::equals(mother(mother(mary.clone())), Term::constant("Jane")),
            &model,
            &empty(),
            None
        ),
        Ok(true)
    );
    assert_eq!(
        denote(
            &Formula::equals(mother(mary.clone()), Term::constant("Susan")),
            &model,
            &empty(),
            None
        ),
        Ok(true)
    );
    assert_eq!(
        denote(
            &Formula::not_equals(var("x"), mary.clone()),
            &model,
            &assign(&[("x", "Susan")]),
            None
        ),
        Ok(true)
    );
    assert_eq!(
        denote_term(&mother(Term::constant("Jane")), &model, &empty(), None),
        Err(EvalError::UndefinedValue {
            symbol: "mother".to_string(),
            args: vec!["Jane".to_string()],
            world: None,
        })
    );
}

#[test]
fn closure_is_idempotent_and_reflexive() {
    let frames = [
        Frame::new(["a"], no_pairs()).unwrap(),
        Frame::new(["a", "b", "c"], [("a", "b"), ("b", "c")]).unwrap(),
        Frame::new(["a", "b", "c", "d"], [("d", "c"), ("c", "b"), ("b", "a"), ("a", "d")])
            .unwrap(),
        Frame::new(["a", "b", "c"], [("a", "a"), ("c", "b")]).unwrap(),
    ];
    for frame in frames {
        let closed = frame.reflexive_transitive_closure();
        assert_eq!(closed.reflexive_transitive_closure(), closed);
        assert!(frame.relation().is_subset(closed.relation()));
        assert!(closed.is_reflexive());
        assert!(closed.is_transitive());
    }
}

fn forking() -> Model {
    // k0 is below k1 and k2; domains grow and P persists
    let sig = Signature::new().atom("p").atom("q").predicate("P", 1);
    let frame = Frame::new(["k0", "k1", "k2"], [("k0", "k1"), ("k0", "k2")]).unwrap();
    KripkeModel::new(
        &sig,
        frame,
        [
            ("k0", domain(["a"])),
            ("k1", domain(["a", "b"])),
            ("k2", domain(["a", "c"])),
        ],
        [
            (
                "k0",
                Interpretation::new()
                    .atom("p", false)
                    .atom("q", false)
                    .predicate("P", 1, [["a"]]),
            ),
            (
                "k1",
                Interpretation::new()
                    .atom("p", true)
                    .atom("q", false)
                    .predicate("P", 1, [["a"], ["b"]]),
            ),
            (
                "k2",
                Interpretation::new()
                    .atom("p", false)
                    .atom("q", true)
                    .predicate("P", 1, [["a"]]),
            ),
        ],
    )
    .unwrap()
    .into()
}

fn sample_formulas() -> Vec<Formula> {
    let p = Formula::atom("p");
    let q = Formula::atom("q");
    let px = pred1("P", var("x"));
    vec![
        p.clone(),
        Formula::not(&p),
        Formula::or(&p, Formula::not(&p)),
        Formula::implies(Formula::not(Formula::not(&p)), &p),
        Formula::implies(&p, &q),
        Formula::iff(&p, &q),
        Formula::or(Formula::implies(&p, &q), Formula::implies(&q, &p)),
        Formula::forall("x", &px),
        Formula::exists("x", Formula::not(&px)),
        Formula::not(Formula::forall("x", &px)),
        Formula::forall("x", Formula::or(&px, Formula::not(&px))),
        Formula::implies(Formula::not(Formula::exists("x", Formula::not(&px))), Formula::forall("x", &px)),
        px.clone(),
        Formula::not(&px),
        Formula::necessarily(&q),
    ]
}

#[test]
fn kripke_truth_is_monotone() {
    let model = forking();
    let states = model.worlds().cloned().collect_vec();
    for f in sample_formulas() {
        for k in &states {
            let a = assign(&[("x", "a")]);
            if denote(&f, &model, &a, Some(k.as_str())) != Ok(true) {
                continue;
            }
            for k2 in model.accessible(k) {
                assert_eq!(
                    denote(&f, &model, &a, Some(k2.as_str())),
                    Ok(true),
                    "{f} holds at {k} but not at {k2}"
                );
            }
        }
    }
}

#[test]
fn kripke_double_negation_differs() {
    let model = forking();
    let p = Formula::atom("p");
    let not_not_p = Formula::not(Formula::not(&p));
    // p is decided at k1 only
    assert_eq!(denote(&p, &model, &empty(), Some("k0")), Ok(false));
    assert_eq!(denote(&not_not_p, &model, &empty(), Some("k0")), Ok(false));

    let model = excluded_middle();
    assert_eq!(denote(&p, &model, &empty(), None), Ok(false));
    assert_eq!(denote(&not_not_p, &model, &empty(), None), Ok(true));
}

#[test]
fn classical_double_negation_agrees() {
    let model = tupperware();
    let formulas = [
        pred1("box", var("x")),
        Formula::exists("y", Formula::pred("fit", [var("y"), var("x")])),
        Formula::forall("y", Formula::implies(pred1("lid", var("y")), pred1("box", var("x")))),
    ];
    let d = model.domain(None).unwrap().clone();
    for f in &formulas {
        for x in &d {
            let a = assign(&[("x", x.as_str())]);
            assert_eq!(
                denote(&Formula::not(Formula::not(f)), &model, &a, None),
                denote(f, &model, &a, None),
                "{f} under x := {x}"
            );
        }
    }
}

#[test]
fn closed_formulas_ignore_the_assignment() {
    let model = tupperware();
    let closed = [
        Formula::exists("x", pred1("box", var("x"))),
        Formula::forall("x", pred1("box", var("x"))),
        Formula::forall_many(
            &["x", "y"],
            Formula::implies(Formula::pred("fit", [var("x"), var("y")]), pred1("lid", var("x"))),
        ),
    ];
    let assignments = [
        empty(),
        assign(&[("x", "bunny")]),
        assign(&[("x", "rectbox"), ("y", "roundlid"), ("z", "bunny")]),
    ];
    for f in &closed {
        assert!(f.is_closed());
        let values = assignments
            .iter()
            .map(|a| true_under(f, &model, a))
            .collect_vec();
        assert!(values.iter().all_equal(), "{f}: {values:?}");
    }
}

#[test]
fn quantifier_tries_every_element() {
    let model = tupperware();
    let f = Formula::forall("x", Formula::equals(var("x"), var("x")));
    let mut ev = Evaluator::with_sink(&model, TraceLog::new());
    assert_eq!(ev.formula(&f, &empty(), None), Ok(true));
    let tried = ev
        .into_sink()
        .records
        .into_iter()
        .filter(|r| r.phase == Phase::Reject)
        .filter_map(|r| r.candidate)
        .collect_vec();
    assert_eq!(
        tried,
        vec!["bunny", "rectbox", "rectlid", "roundbox", "roundlid"]
    );

    let d = model.domain(None).unwrap();
    let all = Assignments::new(["x", "y"], d).collect_vec();
    assert_eq!(all.len(), d.len() * d.len());
    assert!(all.iter().all_unique());
}

#[test]
fn substitution_round_trip() {
    let e = Formula::and(
        Formula::pred("fit", [var("x"), Term::app("f", [var("x")])]),
        Formula::exists("z", Formula::equals(var("z"), var("x"))),
    );
    let x = var("x");
    let y = var("y");
    let there = e.subst("x", &y);
    assert!(!there.free_vars().contains("x"));
    assert_eq!(there.subst("y", &x), e);
}

#[test]
fn errors_propagate_out_of_wrappers() {
    let model = tupperware();
    let f = Formula::forall("x", pred1("jar", var("x")));
    assert_eq!(
        true_in_model(&f, &model),
        Err(EvalError::UndefinedSymbol {
            symbol: "jar".to_string(),
            world: None,
        })
    );
    let model = excluded_middle();
    assert_eq!(
        true_at(&Formula::atom("p"), &model, Some("k5")),
        Err(EvalError::UnknownState {
            state: "k5".to_string()
        })
    );
}

#[test]
fn models_are_shareable() {
    fn shareable<T: Send + Sync>() {}
    shareable::<Model>();
    shareable::<Frame>();
    shareable::<CancelToken>();

    let model = std::sync::Arc::new(family());
    let handle = {
        let model = model.clone();
        std::thread::spawn(move || true_in_model(&Formula::equals(var("x"), var("x")), &model))
    };
    assert_eq!(handle.join().unwrap(), Ok(true));
}

// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Truth in a model: a formula is true in a model if it is true under every
//! assignment, at every world of a modal model or at the root of a Kripke
//! model.

use fol::syntax::Formula;
use itertools::Itertools;
use serde::Serialize;
use std::fmt;

use crate::assignment::{fmt_assignment, Assignment, Assignments};
use crate::conf::EvalConf;
use crate::denote::Evaluator;
use crate::error::EvalError;
use crate::frame::World;
use crate::model::Model;

/// A world and an assignment at which a formula is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counterexample {
    /// The world, if the model has worlds
    pub world: Option<World>,
    /// The assignment, restricted as in [`EvalConf::restrict_assignments`]
    pub assignment: Assignment,
}

impl fmt::Display for Counterexample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.world {
            Some(w) => write!(f, "at {w} under {}", fmt_assignment(&self.assignment)),
            None => write!(f, "under {}", fmt_assignment(&self.assignment)),
        }
    }
}

/// The variables assignments range over when checking `f`: the model's
/// variables and the free variables of `f`. A closed formula gets none, so it
/// is evaluated once under the empty assignment even when the domain is
/// empty. When restricting, only variables occurring in `f` are kept.
fn assignment_vars(f: &Formula, model: &Model, conf: &EvalConf) -> Vec<String> {
    let free = f.free_vars();
    if free.is_empty() {
        return vec![];
    }
    let occurring = f.vars();
    model
        .variables()
        .iter()
        .chain(free.iter())
        .filter(|x| !conf.restrict_assignments || occurring.contains(*x))
        .unique()
        .cloned()
        .collect()
}

/// The worlds whose truth makes up truth in the model: none for a classical
/// model, every world of a modal model, and the root of a Kripke model.
fn target_worlds(model: &Model) -> Vec<Option<&str>> {
    match model {
        Model::Classical(_) => vec![None],
        Model::Modal(_) | Model::Varying(_) => model.worlds().map(|w| Some(w.as_str())).collect(),
        Model::Kripke(m) => vec![Some(m.root().as_str())],
    }
}

/// The first assignment of `vars` under which `f` is false at `world`.
fn failure_at(
    ev: &mut Evaluator<'_>,
    f: &Formula,
    world: Option<&str>,
    vars: &[String],
) -> Result<Option<Assignment>, EvalError> {
    let mut tried = 0;
    for assignment in Assignments::new(vars.iter().cloned(), ev.model().domain(world)?) {
        tried += 1;
        if !ev.formula(f, &assignment, world)? {
            log::debug!(
                "{f} fails under {} after {tried} assignments",
                fmt_assignment(&assignment)
            );
            return Ok(Some(assignment));
        }
    }
    log::debug!("{f} holds under all {tried} assignments");
    Ok(None)
}

/// Whether `f` is true under every assignment at `world`.
pub fn true_at(f: &Formula, model: &Model, world: Option<&str>) -> Result<bool, EvalError> {
    true_at_with(f, model, world, &EvalConf::default())
}

/// [`true_at`] with a given configuration.
pub fn true_at_with(
    f: &Formula,
    model: &Model,
    world: Option<&str>,
    conf: &EvalConf,
) -> Result<bool, EvalError> {
    model.resolve(world)?;
    let vars = assignment_vars(f, model, conf);
    let mut ev = Evaluator::new(model).with_conf(conf.clone());
    Ok(failure_at(&mut ev, f, world, &vars)?.is_none())
}

/// Whether `f` is true under `assignment` at every world of a modal model, at
/// the root of a Kripke model, or simply in a classical model.
pub fn true_under(f: &Formula, model: &Model, assignment: &Assignment) -> Result<bool, EvalError> {
    true_under_with(f, model, assignment, &EvalConf::default())
}

/// [`true_under`] with a given configuration.
pub fn true_under_with(
    f: &Formula,
    model: &Model,
    assignment: &Assignment,
    conf: &EvalConf,
) -> Result<bool, EvalError> {
    let mut ev = Evaluator::new(model).with_conf(conf.clone());
    for world in target_worlds(model) {
        if !ev.formula(f, assignment, world)? {
            log::debug!("{f} fails at {}", world.unwrap_or("the model"));
            return Ok(false);
        }
    }
    Ok(true)
}

/// Whether `f` is true in `model`.
pub fn true_in_model(f: &Formula, model: &Model) -> Result<bool, EvalError> {
    true_in_model_with(f, model, &EvalConf::default())
}

/// [`true_in_model`] with a given configuration.
pub fn true_in_model_with(f: &Formula, model: &Model, conf: &EvalConf) -> Result<bool, EvalError> {
    Ok(counterexample_with(f, model, conf)?.is_none())
}

/// The first world and assignment at which `f` is false, trying worlds in
/// order and assignments in the order of [`Assignments`].
pub fn counterexample(f: &Formula, model: &Model) -> Result<Option<Counterexample>, EvalError> {
    counterexample_with(f, model, &EvalConf::default())
}

/// [`counterexample`] with a given configuration.
pub fn counterexample_with(
    f: &Formula,
    model: &Model,
    conf: &EvalConf,
) -> Result<Option<Counterexample>, EvalError> {
    let vars = assignment_vars(f, model, conf);
    let mut ev = Evaluator::new(model).with_conf(conf.clone());
    for world in target_worlds(model) {
        if let Some(assignment) = failure_at(&mut ev, f, world, &vars)? {
            return Ok(Some(Counterexample {
                world: world.map(|w| w.to_string()),
                assignment,
            }));
        }
    }
    Ok(None)
}

// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! The denotation of terms and formulas in a model, under an assignment and
//! at a world.
//!
//! Classical and modal models use Tarskian clauses, with `<>` and `[]`
//! ranging over accessible worlds. Kripke models use forcing:
//!
//! - atoms and predicates hold at `k` if they hold at some `k' <= k`;
//! - `!`, `->` and `<->` quantify over every `k' >= k`, while `&` and `|` are
//!   local;
//! - `exists` ranges over the domain at `k`, and `forall` over the domains of
//!   every `k' >= k`, evaluating its body at `k'`.
//!
//! Quantifiers try elements in the sorted order of the domain and stop at
//! the first element that settles the result.

use fol::signature::SymbolKind;
use fol::syntax::*;

use crate::assignment::{restrict, Assignment};
use crate::conf::EvalConf;
use crate::error::EvalError;
use crate::frame::World;
use crate::interp::{Denotation, Element};
use crate::model::Model;
use crate::trace::{Candidate, NoTrace, Phase, TraceEvent, TraceSink};

fn at(w: Option<&World>) -> Option<&str> {
    w.map(|w| w.as_str())
}

fn state(w: Option<&World>) -> Result<&World, EvalError> {
    w.ok_or(EvalError::WorldRequired)
}

/// Evaluates terms and formulas in a fixed model, reporting quantifier and
/// modal steps to a trace sink.
pub struct Evaluator<'m, S: TraceSink = NoTrace> {
    model: &'m Model,
    sink: S,
    conf: EvalConf,
}

impl<'m> Evaluator<'m, NoTrace> {
    /// An evaluator that does not trace.
    pub fn new(model: &'m Model) -> Self {
        Self::with_sink(model, NoTrace)
    }
}

impl<'m, S: TraceSink> Evaluator<'m, S> {
    /// An evaluator reporting to `sink`.
    pub fn with_sink(model: &'m Model, sink: S) -> Self {
        Self {
            model,
            sink,
            conf: EvalConf::default(),
        }
    }

    /// Use the given configuration.
    pub fn with_conf(mut self, conf: EvalConf) -> Self {
        self.conf = conf;
        self
    }

    /// The model being evaluated in.
    pub fn model(&self) -> &'m Model {
        self.model
    }

    /// The configuration in use.
    pub fn conf(&self) -> &EvalConf {
        &self.conf
    }

    /// The trace sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give back the trace sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Evaluate a term to an element of the domain at `world`.
    pub fn term(
        &self,
        t: &Term,
        assignment: &Assignment,
        world: Option<&str>,
    ) -> Result<Element, EvalError> {
        let w = self.model.resolve(world)?;
        self.eval_term(t, assignment, w)
    }

    /// Evaluate a formula to its truth value at `world`. For Kripke models a
    /// missing world means the root.
    pub fn formula(
        &mut self,
        f: &Formula,
        assignment: &Assignment,
        world: Option<&str>,
    ) -> Result<bool, EvalError> {
        let w = self.model.resolve(world)?;
        self.eval(f, assignment, w, 0)
    }

    fn emit<'a>(&mut self, event: impl FnOnce() -> TraceEvent<'a>) {
        if self.sink.enabled() {
            self.sink.record(event())
        }
    }

    fn eval_term(
        &self,
        t: &Term,
        assignment: &Assignment,
        w: Option<&'m World>,
    ) -> Result<Element, EvalError> {
        match t {
            Term::Var(x) => {
                assignment
                    .get(x)
                    .cloned()
                    .ok_or_else(|| EvalError::MissingAssignment {
                        variable: x.clone(),
                    })
            }
            Term::Const(c) => match self.model.interpret(c, at(w))? {
                Denotation::Individual(e) => Ok(e.clone()),
                _ => Err(EvalError::KindMismatch {
                    symbol: c.clone(),
                    expected: SymbolKind::Constant,
                    world: w.cloned(),
                }),
            },
            Term::App(f, args) => {
                let args = args
                    .iter()
                    .map(|arg| self.eval_term(arg, assignment, w))
                    .collect::<Result<Vec<_>, _>>()?;
                match self.model.interpret(f, at(w))? {
                    Denotation::Function(func) if func.arity != args.len() => {
                        Err(EvalError::ArityMismatch {
                            symbol: f.clone(),
                            expected: func.arity,
                            actual: args.len(),
                        })
                    }
                    Denotation::Function(func) => {
                        func.get(&args)
                            .cloned()
                            .ok_or_else(|| EvalError::UndefinedValue {
                                symbol: f.clone(),
                                args,
                                world: w.cloned(),
                            })
                    }
                    _ => Err(EvalError::KindMismatch {
                        symbol: f.clone(),
                        expected: SymbolKind::Function(args.len()),
                        world: w.cloned(),
                    }),
                }
            }
        }
    }

    /// The value of a propositional atom at exactly `w`.
    fn truth_value(&self, p: &str, w: Option<&'m World>) -> Result<bool, EvalError> {
        match self.model.interpret(p, at(w))? {
            Denotation::Truth(b) => Ok(*b),
            Denotation::Relation(r) if r.arity == 0 => Ok(r.contains(&[])),
            _ => Err(EvalError::KindMismatch {
                symbol: p.to_string(),
                expected: SymbolKind::Atom,
                world: w.cloned(),
            }),
        }
    }

    /// Whether predicate `p` holds of `args` at exactly `w`.
    fn relation_value(
        &self,
        p: &str,
        args: &[Element],
        w: Option<&'m World>,
    ) -> Result<bool, EvalError> {
        match self.model.interpret(p, at(w))? {
            Denotation::Relation(r) if r.arity == args.len() => Ok(r.contains(args)),
            Denotation::Relation(r) => Err(EvalError::ArityMismatch {
                symbol: p.to_string(),
                expected: r.arity,
                actual: args.len(),
            }),
            Denotation::Truth(b) if args.is_empty() => Ok(*b),
            _ => Err(EvalError::KindMismatch {
                symbol: p.to_string(),
                expected: SymbolKind::Predicate(args.len()),
                world: w.cloned(),
            }),
        }
    }

    /// In a Kripke model, whether `holds` at some state at or below `w`.
    /// Elsewhere, whether `holds` at `w`.
    fn persistent<F>(&self, w: Option<&'m World>, holds: F) -> Result<bool, EvalError>
    where
        F: Fn(Option<&'m World>) -> Result<bool, EvalError>,
    {
        let model: &'m Model = self.model;
        match model {
            Model::Kripke(m) => {
                for k in m.past(state(w)?)? {
                    if holds(Some(k))? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            _ => holds(w),
        }
    }

    /// In a Kripke model, whether `holds` at every state at or above `w`.
    /// Elsewhere, whether `holds` at `w`.
    fn forall_future<F>(&mut self, w: Option<&'m World>, mut holds: F) -> Result<bool, EvalError>
    where
        F: FnMut(&mut Self, Option<&'m World>) -> Result<bool, EvalError>,
    {
        let model: &'m Model = self.model;
        match model {
            Model::Kripke(m) => {
                for k in m.future(state(w)?)? {
                    self.conf.check_canceled()?;
                    if !holds(self, Some(k))? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => holds(self, w),
        }
    }

    fn eval(
        &mut self,
        f: &Formula,
        assignment: &Assignment,
        w: Option<&'m World>,
        depth: usize,
    ) -> Result<bool, EvalError> {
        self.conf.check_canceled()?;
        match f {
            Formula::Literal(b) => Ok(*b),
            Formula::Atom(p) => self.persistent(w, |k| self.truth_value(p, k)),
            Formula::Equals(lhs, rhs) => {
                Ok(self.eval_term(lhs, assignment, w)? == self.eval_term(rhs, assignment, w)?)
            }
            Formula::Pred(p, args) => {
                let args = args
                    .iter()
                    .map(|arg| self.eval_term(arg, assignment, w))
                    .collect::<Result<Vec<_>, _>>()?;
                self.persistent(w, |k| self.relation_value(p, &args, k))
            }
            Formula::UnaryOp(UOp::Not, body) => {
                self.forall_future(w, |this, k| Ok(!this.eval(body, assignment, k, depth)?))
            }
            Formula::UnaryOp(op @ (UOp::Possibly | UOp::Necessarily), body) => {
                let model: &'m Model = self.model;
                let worlds = w.into_iter().flat_map(|w| model.accessible(w));
                let candidates = worlds.map(|v| (Candidate::World(v), Some(v), assignment.clone()));
                let stop_on = *op == UOp::Possibly;
                self.search(f, body, assignment, w, depth, stop_on, candidates)
            }
            Formula::BinOp(BinOp::And, lhs, rhs) => {
                Ok(self.eval(lhs, assignment, w, depth)? && self.eval(rhs, assignment, w, depth)?)
            }
            Formula::BinOp(BinOp::Or, lhs, rhs) => {
                Ok(self.eval(lhs, assignment, w, depth)? || self.eval(rhs, assignment, w, depth)?)
            }
            Formula::BinOp(BinOp::Implies, lhs, rhs) => self.forall_future(w, |this, k| {
                Ok(!this.eval(lhs, assignment, k, depth)? || this.eval(rhs, assignment, k, depth)?)
            }),
            Formula::BinOp(BinOp::Iff, lhs, rhs) => self.forall_future(w, |this, k| {
                Ok(this.eval(lhs, assignment, k, depth)? == this.eval(rhs, assignment, k, depth)?)
            }),
            Formula::Quantified {
                quantifier: Quantifier::Exists,
                binder,
                body,
            } => {
                let model: &'m Model = self.model;
                let domain = model.domain(at(w))?;
                let candidates = domain.iter().map(|d| {
                    let variant = assignment.update(binder.clone(), d.clone());
                    (Candidate::Element(d), w, variant)
                });
                self.search(f, body, assignment, w, depth, true, candidates)
            }
            Formula::Quantified {
                quantifier: Quantifier::Forall,
                binder,
                body,
            } => {
                let model: &'m Model = self.model;
                // the states the body is evaluated at, with their domains
                let scopes = match model {
                    Model::Kripke(m) => m
                        .future(state(w)?)?
                        .iter()
                        .map(|k| -> Result<_, EvalError> {
                            Ok((Some(k), model.domain(Some(k.as_str()))?))
                        })
                        .collect::<Result<Vec<_>, EvalError>>()?,
                    _ => vec![(w, model.domain(at(w))?)],
                };
                let candidates = scopes.into_iter().flat_map(move |(k, domain)| {
                    domain.iter().map(move |d| {
                        let variant = assignment.update(binder.clone(), d.clone());
                        (Candidate::Element(d), k, variant)
                    })
                });
                self.search(f, body, assignment, w, depth, false, candidates)
            }
        }
    }

    /// Evaluate `body` for each candidate until one gives `stop_on`, which is
    /// then the value of `node`; if none does, the value is `!stop_on`.
    #[allow(clippy::too_many_arguments)]
    fn search<I>(
        &mut self,
        node: &Formula,
        body: &Formula,
        assignment: &Assignment,
        w: Option<&'m World>,
        depth: usize,
        stop_on: bool,
        candidates: I,
    ) -> Result<bool, EvalError>
    where
        I: Iterator<Item = (Candidate<'m>, Option<&'m World>, Assignment)>,
    {
        let event = |phase, world, candidate, verdict, depth| TraceEvent {
            node,
            world,
            assignment: restrict(assignment, &node.free_vars()),
            phase,
            candidate,
            verdict,
            depth,
        };
        self.emit(|| event(Phase::Enter, w, None, None, depth));
        for (candidate, k, variant) in candidates {
            self.conf.check_canceled()?;
            let value = self.eval(body, &variant, k, depth + 1)?;
            let phase = if value == stop_on {
                Phase::Pick
            } else {
                Phase::Reject
            };
            self.emit(|| event(phase, k, Some(candidate), Some(value), depth + 1));
            if value == stop_on {
                self.emit(|| event(Phase::Verdict, w, None, Some(stop_on), depth));
                return Ok(stop_on);
            }
        }
        self.emit(|| event(Phase::Verdict, w, None, Some(!stop_on), depth));
        Ok(!stop_on)
    }
}

/// The truth value of `f` in `model` under `assignment` at `world`, without
/// tracing.
pub fn denote(
    f: &Formula,
    model: &Model,
    assignment: &Assignment,
    world: Option<&str>,
) -> Result<bool, EvalError> {
    Evaluator::new(model).formula(f, assignment, world)
}

/// The element `t` denotes in `model` under `assignment` at `world`.
pub fn denote_term(
    t: &Term,
    model: &Model,
    assignment: &Assignment,
    world: Option<&str>,
) -> Result<Element, EvalError> {
    Evaluator::new(model).term(t, assignment, world)
}

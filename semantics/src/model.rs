// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Finite models: classical structures, modal models with constant or
//! varying domains, and Kripke models for intuitionistic logic.
//!
//! Every shape is validated against a [`Signature`] when it is built and is
//! immutable afterwards. The evaluator only talks to the shapes through
//! [`Model`].

use fol::signature::Signature;
use itertools::Itertools;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::assignment::Assignments;
use crate::error::{EvalError, ModelError};
use crate::frame::{Frame, World};
use crate::interp::{Denotation, Domain, Element, Interpretation};

/// The name of the root state of a Kripke model unless another is given.
pub const DEFAULT_ROOT: &str = "k0";

/// Collect elements into a [`Domain`].
pub fn domain<I>(elements: I) -> Domain
where
    I: IntoIterator,
    I::Item: Into<Element>,
{
    elements.into_iter().map(|e| e.into()).collect()
}

/// The logic a model gives semantics for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Logic {
    /// Tarskian semantics over a single structure
    Classical,
    /// Possible worlds sharing one domain
    Modal,
    /// Possible worlds each with their own domain
    VaryingModal,
    /// Kripke semantics over a rooted preorder of states
    Intuitionistic,
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Logic::Classical => "classical",
            Logic::Modal => "constant-domain modal",
            Logic::VaryingModal => "varying-domain modal",
            Logic::Intuitionistic => "intuitionistic",
        };
        write!(f, "{s}")
    }
}

/// Check that `interp` gives every symbol of `signature` a denotation of the
/// declared kind and arity, using only elements of `domain`.
fn check_interpretation(
    signature: &Signature,
    interp: &Interpretation,
    domain: &Domain,
    world: Option<&World>,
) -> Result<(), ModelError> {
    for decl in &signature.symbols {
        let symbol = || decl.name.clone();
        let world = || world.cloned();
        let denotation = interp
            .get(&decl.name)
            .ok_or_else(|| ModelError::MissingInterpretation {
                symbol: symbol(),
                world: world(),
            })?;
        if !denotation.fits(decl.kind) {
            return Err(ModelError::KindMismatch {
                symbol: symbol(),
                expected: decl.kind,
                world: world(),
            });
        }
        if denotation.arity() != decl.kind.arity() {
            return Err(ModelError::ArityMismatch {
                symbol: symbol(),
                expected: decl.kind.arity(),
                actual: denotation.arity(),
                world: world(),
            });
        }
        // a function row carries its output after the arguments
        let outputs = match denotation {
            Denotation::Function(_) | Denotation::Individual(_) => 1,
            Denotation::Relation(_) | Denotation::Truth(_) => 0,
        };
        for row in denotation.rows() {
            if row.len() != decl.kind.arity() + outputs {
                return Err(ModelError::ArityMismatch {
                    symbol: symbol(),
                    expected: decl.kind.arity(),
                    actual: row.len() - outputs,
                    world: world(),
                });
            }
            if let Some(element) = row.into_iter().find(|e| !domain.contains(*e)) {
                return Err(ModelError::ElementNotInDomain {
                    symbol: symbol(),
                    element: element.clone(),
                    world: world(),
                });
            }
        }
    }
    Ok(())
}

/// Collect a per-world table and check it covers exactly the worlds of the
/// frame.
fn per_world<I, S, T>(
    frame: &Frame,
    entries: I,
    missing: fn(World) -> ModelError,
) -> Result<BTreeMap<World, T>, ModelError>
where
    I: IntoIterator<Item = (S, T)>,
    S: Into<World>,
{
    let table: BTreeMap<World, T> = entries.into_iter().map(|(w, t)| (w.into(), t)).collect();
    if let Some(w) = table.keys().find(|w| !frame.contains(w)) {
        return Err(ModelError::UnknownWorld(w.clone()));
    }
    if let Some(w) = frame.worlds().find(|w| !table.contains_key(*w)) {
        return Err(missing(w.clone()));
    }
    Ok(table)
}

/// A classical first-order structure: one domain and one interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassicalModel {
    signature: Signature,
    domain: Domain,
    interp: Interpretation,
    variables: Vec<String>,
}

impl ClassicalModel {
    /// Constructor for a ClassicalModel
    pub fn new(
        signature: &Signature,
        domain: Domain,
        interp: Interpretation,
    ) -> Result<Self, ModelError> {
        signature.check()?;
        check_interpretation(signature, &interp, &domain, None)?;
        Ok(Self {
            signature: signature.clone(),
            domain,
            interp,
            variables: vec![],
        })
    }

    /// The domain of the structure.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// The interpretation of the structure.
    pub fn interp(&self) -> &Interpretation {
        &self.interp
    }
}

/// A modal model whose worlds all share one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalModel {
    signature: Signature,
    frame: Frame,
    domain: Domain,
    interps: BTreeMap<World, Interpretation>,
    variables: Vec<String>,
}

impl ModalModel {
    /// Constructor for a ModalModel. `interps` must give an interpretation for
    /// exactly the worlds of `frame`.
    pub fn new<I, S>(
        signature: &Signature,
        frame: Frame,
        domain: Domain,
        interps: I,
    ) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (S, Interpretation)>,
        S: Into<World>,
    {
        signature.check()?;
        let interps = per_world(&frame, interps, ModelError::MissingWorldInterpretation)?;
        for (w, interp) in &interps {
            check_interpretation(signature, interp, &domain, Some(w))?;
        }
        Ok(Self {
            signature: signature.clone(),
            frame,
            domain,
            interps,
            variables: vec![],
        })
    }

    /// The domain shared by every world.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }
}

/// A modal model where each world has its own domain. No relationship
/// between the domains of related worlds is assumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaryingModel {
    signature: Signature,
    frame: Frame,
    domains: BTreeMap<World, Domain>,
    interps: BTreeMap<World, Interpretation>,
    variables: Vec<String>,
}

impl VaryingModel {
    /// Constructor for a VaryingModel. Each world's interpretation may only
    /// mention elements of that world's domain.
    pub fn new<D, I, S1, S2>(
        signature: &Signature,
        frame: Frame,
        domains: D,
        interps: I,
    ) -> Result<Self, ModelError>
    where
        D: IntoIterator<Item = (S1, Domain)>,
        I: IntoIterator<Item = (S2, Interpretation)>,
        S1: Into<World>,
        S2: Into<World>,
    {
        signature.check()?;
        let domains = per_world(&frame, domains, ModelError::MissingDomain)?;
        let interps = per_world(&frame, interps, ModelError::MissingWorldInterpretation)?;
        for (w, interp) in &interps {
            check_interpretation(signature, interp, &domains[w], Some(w))?;
        }
        Ok(Self {
            signature: signature.clone(),
            frame,
            domains,
            interps,
            variables: vec![],
        })
    }
}

/// A Kripke model for intuitionistic logic: states ordered by a rooted
/// preorder, each with a domain and an interpretation.
///
/// The order is replaced by its reflexive-transitive closure at construction.
/// Domain monotonicity and persistence of atoms and predicates are expected
/// of the input but not enforced; a warning is logged when they fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KripkeModel {
    signature: Signature,
    frame: Frame,
    domains: BTreeMap<World, Domain>,
    interps: BTreeMap<World, Interpretation>,
    root: World,
    variables: Vec<String>,
}

impl KripkeModel {
    /// Constructor for a KripkeModel rooted at [`DEFAULT_ROOT`].
    pub fn new<D, I, S1, S2>(
        signature: &Signature,
        frame: Frame,
        domains: D,
        interps: I,
    ) -> Result<Self, ModelError>
    where
        D: IntoIterator<Item = (S1, Domain)>,
        I: IntoIterator<Item = (S2, Interpretation)>,
        S1: Into<World>,
        S2: Into<World>,
    {
        Self::with_root(signature, frame, domains, interps, DEFAULT_ROOT)
    }

    /// Constructor for a KripkeModel with a given root state.
    pub fn with_root<D, I, S1, S2>(
        signature: &Signature,
        frame: Frame,
        domains: D,
        interps: I,
        root: &str,
    ) -> Result<Self, ModelError>
    where
        D: IntoIterator<Item = (S1, Domain)>,
        I: IntoIterator<Item = (S2, Interpretation)>,
        S1: Into<World>,
        S2: Into<World>,
    {
        signature.check()?;
        if !frame.contains(root) {
            return Err(ModelError::MissingRoot(root.to_string()));
        }
        let domains = per_world(&frame, domains, ModelError::MissingDomain)?;
        let interps = per_world(&frame, interps, ModelError::MissingWorldInterpretation)?;
        for (k, interp) in &interps {
            check_interpretation(signature, interp, &domains[k], Some(k))?;
        }
        let model = Self {
            signature: signature.clone(),
            frame: frame.reflexive_transitive_closure(),
            domains,
            interps,
            root: root.to_string(),
            variables: vec![],
        };
        for (k, k2) in model.monotonicity_violations() {
            log::warn!("domain of state {k2} does not include the domain of {k}");
        }
        for (symbol, k, k2) in model.persistence_violations() {
            log::warn!("{symbol} at state {k} does not persist to the later state {k2}");
        }
        Ok(model)
    }

    /// The root state.
    pub fn root(&self) -> &World {
        &self.root
    }

    /// The closed order on states.
    pub fn order(&self) -> &Frame {
        &self.frame
    }

    /// The states at or below `k`.
    pub fn past(&self, k: &str) -> Result<&BTreeSet<World>, EvalError> {
        self.frame
            .predecessors(k)
            .ok_or_else(|| EvalError::UnknownState {
                state: k.to_string(),
            })
    }

    /// The states at or above `k`.
    pub fn future(&self, k: &str) -> Result<&BTreeSet<World>, EvalError> {
        self.frame
            .successors(k)
            .ok_or_else(|| EvalError::UnknownState {
                state: k.to_string(),
            })
    }

    /// Pairs `k <= k2` where the domain of `k` is not included in that of
    /// `k2`.
    fn monotonicity_violations(&self) -> Vec<(&World, &World)> {
        self.frame
            .relation()
            .iter()
            .filter(|(k, k2)| !self.domains[k].is_subset(&self.domains[k2]))
            .map(|(k, k2)| (k, k2))
            .collect()
    }

    /// Triples `(symbol, k, k2)` with `k <= k2` where an atom or a tuple of a
    /// predicate holds at `k` but not at `k2`, or a constant or a function
    /// value at `k` changes at `k2`.
    fn persistence_violations(&self) -> Vec<(&String, &World, &World)> {
        let holds_later = |now: &Denotation, later: Option<&Denotation>| match (now, later) {
            (Denotation::Truth(true), Some(Denotation::Truth(b))) => *b,
            (Denotation::Relation(r), Some(Denotation::Relation(r2))) => {
                r.tuples.is_subset(&r2.tuples)
            }
            (Denotation::Individual(e), Some(Denotation::Individual(e2))) => e == e2,
            (Denotation::Function(f), Some(Denotation::Function(f2))) => f
                .table
                .iter()
                .all(|(args, value)| f2.get(args) == Some(value)),
            _ => true,
        };
        self.frame
            .relation()
            .iter()
            .flat_map(|(k, k2)| {
                self.interps[k]
                    .symbols()
                    .filter(move |(symbol, d)| {
                        !holds_later(d, self.interps[k2].get(symbol.as_str()))
                    })
                    .map(move |(symbol, _)| (symbol, k, k2))
            })
            .collect()
    }

    /// Whether domains only grow, atoms and predicates persist, and constants
    /// and function values stay fixed along the order.
    pub fn is_monotone(&self) -> bool {
        self.monotonicity_violations().is_empty() && self.persistence_violations().is_empty()
    }
}

/// A model of any of the supported shapes. This is the interface the
/// evaluator is written against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Model {
    #[allow(missing_docs)]
    Classical(ClassicalModel),
    #[allow(missing_docs)]
    Modal(ModalModel),
    #[allow(missing_docs)]
    Varying(VaryingModel),
    #[allow(missing_docs)]
    Kripke(KripkeModel),
}

impl From<ClassicalModel> for Model {
    fn from(value: ClassicalModel) -> Self {
        Model::Classical(value)
    }
}

impl From<ModalModel> for Model {
    fn from(value: ModalModel) -> Self {
        Model::Modal(value)
    }
}

impl From<VaryingModel> for Model {
    fn from(value: VaryingModel) -> Self {
        Model::Varying(value)
    }
}

impl From<KripkeModel> for Model {
    fn from(value: KripkeModel) -> Self {
        Model::Kripke(value)
    }
}

impl Model {
    /// The logic this model is a model of.
    pub fn logic(&self) -> Logic {
        match self {
            Model::Classical(_) => Logic::Classical,
            Model::Modal(_) => Logic::Modal,
            Model::Varying(_) => Logic::VaryingModal,
            Model::Kripke(_) => Logic::Intuitionistic,
        }
    }

    /// The signature the model was checked against.
    pub fn signature(&self) -> &Signature {
        match self {
            Model::Classical(m) => &m.signature,
            Model::Modal(m) => &m.signature,
            Model::Varying(m) => &m.signature,
            Model::Kripke(m) => &m.signature,
        }
    }

    /// The variables [`Model::assignments`] assigns.
    pub fn variables(&self) -> &[String] {
        match self {
            Model::Classical(m) => &m.variables,
            Model::Modal(m) => &m.variables,
            Model::Varying(m) => &m.variables,
            Model::Kripke(m) => &m.variables,
        }
    }

    /// Declare the variables that assignments of this model range over.
    pub fn with_variables<I>(mut self, variables: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let variables = variables.into_iter().map(|v| v.into()).unique().collect();
        match &mut self {
            Model::Classical(m) => m.variables = variables,
            Model::Modal(m) => m.variables = variables,
            Model::Varying(m) => m.variables = variables,
            Model::Kripke(m) => m.variables = variables,
        }
        self
    }

    /// The frame of a modal model, or the closed order of a Kripke model.
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            Model::Classical(_) => None,
            Model::Modal(m) => Some(&m.frame),
            Model::Varying(m) => Some(&m.frame),
            Model::Kripke(m) => Some(&m.frame),
        }
    }

    /// The worlds (or states) of the model, empty for a classical model.
    pub fn worlds(&self) -> impl Iterator<Item = &World> {
        self.frame().into_iter().flat_map(|f| f.worlds())
    }

    /// Resolve an optional world argument to a world of the model.
    ///
    /// A classical model has no worlds and rejects any. A modal model needs
    /// one. A Kripke model defaults to its root.
    pub fn resolve(&self, world: Option<&str>) -> Result<Option<&World>, EvalError> {
        match (self, world) {
            (Model::Classical(_), None) => Ok(None),
            (Model::Classical(_), Some(w)) => Err(EvalError::UnknownWorld {
                world: w.to_string(),
            }),
            (Model::Modal(_) | Model::Varying(_), None) => Err(EvalError::WorldRequired),
            (Model::Modal(_) | Model::Varying(_), Some(w)) => self
                .frame()
                .and_then(|f| f.get(w))
                .map(Some)
                .ok_or_else(|| EvalError::UnknownWorld {
                    world: w.to_string(),
                }),
            (Model::Kripke(m), None) => Ok(Some(&m.root)),
            (Model::Kripke(m), Some(k)) => {
                m.frame
                    .get(k)
                    .map(Some)
                    .ok_or_else(|| EvalError::UnknownState {
                        state: k.to_string(),
                    })
            }
        }
    }

    fn lookup<'a, T>(
        &self,
        table: &'a BTreeMap<World, T>,
        world: Option<&str>,
    ) -> Result<&'a T, EvalError> {
        let missing = || match self {
            Model::Kripke(_) => EvalError::UnknownState {
                state: world.unwrap_or_default().to_string(),
            },
            _ => EvalError::UnknownWorld {
                world: world.unwrap_or_default().to_string(),
            },
        };
        match self.resolve(world)? {
            Some(w) => table.get(w).ok_or_else(missing),
            None => Err(EvalError::WorldRequired),
        }
    }

    /// The domain at a world.
    pub fn domain(&self, world: Option<&str>) -> Result<&Domain, EvalError> {
        match self {
            Model::Classical(m) => {
                self.resolve(world)?;
                Ok(&m.domain)
            }
            Model::Modal(m) => {
                self.resolve(world)?;
                Ok(&m.domain)
            }
            Model::Varying(m) => self.lookup(&m.domains, world),
            Model::Kripke(m) => self.lookup(&m.domains, world),
        }
    }

    /// The interpretation at a world.
    pub fn interpretation(&self, world: Option<&str>) -> Result<&Interpretation, EvalError> {
        match self {
            Model::Classical(m) => {
                self.resolve(world)?;
                Ok(&m.interp)
            }
            Model::Modal(m) => self.lookup(&m.interps, world),
            Model::Varying(m) => self.lookup(&m.interps, world),
            Model::Kripke(m) => self.lookup(&m.interps, world),
        }
    }

    /// The denotation of `symbol` at a world.
    pub fn interpret(&self, symbol: &str, world: Option<&str>) -> Result<&Denotation, EvalError> {
        self.interpretation(world)?
            .get(symbol)
            .ok_or_else(|| EvalError::UndefinedSymbol {
                symbol: symbol.to_string(),
                world: world.map(|w| w.to_string()),
            })
    }

    /// The worlds accessible from `world`: successors in the frame of a modal
    /// model, the states above it in a Kripke model, and none in a classical
    /// model.
    pub fn accessible<'a>(&'a self, world: &str) -> impl Iterator<Item = &'a World> + 'a {
        self.frame()
            .and_then(|f| f.successors(world))
            .into_iter()
            .flatten()
    }

    /// All total maps from [`Model::variables`] to the domain at a world.
    pub fn assignments(&self, world: Option<&str>) -> Result<Assignments<'_>, EvalError> {
        Ok(Assignments::new(
            self.variables().iter().cloned(),
            self.domain(world)?,
        ))
    }
}

fn fmt_domain(domain: &Domain) -> String {
    format!("{{{}}}", domain.iter().join(", "))
}

fn fmt_interp(f: &mut fmt::Formatter<'_>, interp: &Interpretation) -> fmt::Result {
    for line in interp.to_string().lines() {
        writeln!(f, "  {line}")?;
    }
    Ok(())
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} model", self.logic())?;
        if let Model::Kripke(m) = self {
            writeln!(f, "root: {}", m.root)?;
        }
        if let Some(frame) = self.frame() {
            write!(f, "{frame}")?;
        }
        match self {
            Model::Classical(m) => {
                writeln!(f, "domain: {}", fmt_domain(&m.domain))?;
                fmt_interp(f, &m.interp)
            }
            Model::Modal(m) => {
                writeln!(f, "domain: {}", fmt_domain(&m.domain))?;
                for (w, interp) in &m.interps {
                    writeln!(f, "world {w}:")?;
                    fmt_interp(f, interp)?;
                }
                Ok(())
            }
            Model::Varying(VaryingModel {
                domains, interps, ..
            })
            | Model::Kripke(KripkeModel {
                domains, interps, ..
            }) => {
                for (w, interp) in interps {
                    writeln!(f, "world {w}: domain {}", fmt_domain(&domains[w]))?;
                    fmt_interp(f, interp)?;
                }
                Ok(())
            }
        }
    }
}

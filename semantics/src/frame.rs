// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Frames: a finite set of worlds with an accessibility relation.

use itertools::Itertools;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::ModelError;

/// The name of a world of a modal model, or a state of a Kripke model.
pub type World = String;

/// A finite set of worlds and a binary relation on them. The successors and
/// predecessors of every world are indexed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    worlds: BTreeSet<World>,
    relation: BTreeSet<(World, World)>,
    #[serde(skip)]
    successors: BTreeMap<World, BTreeSet<World>>,
    #[serde(skip)]
    predecessors: BTreeMap<World, BTreeSet<World>>,
}

impl Frame {
    /// Construct a frame, checking that the relation only relates worlds of
    /// the frame.
    pub fn new<W, R, S>(worlds: W, relation: R) -> Result<Self, ModelError>
    where
        W: IntoIterator<Item = S>,
        R: IntoIterator<Item = (S, S)>,
        S: Into<World>,
    {
        let worlds: BTreeSet<World> = worlds.into_iter().map(|w| w.into()).collect();
        let relation: BTreeSet<(World, World)> = relation
            .into_iter()
            .map(|(w, v)| (w.into(), v.into()))
            .collect();
        for (w, v) in &relation {
            for x in [w, v] {
                if !worlds.contains(x) {
                    return Err(ModelError::UnknownWorld(x.clone()));
                }
            }
        }
        Ok(Self::from_parts(worlds, relation))
    }

    fn from_parts(worlds: BTreeSet<World>, relation: BTreeSet<(World, World)>) -> Self {
        let mut successors: BTreeMap<World, BTreeSet<World>> = worlds
            .iter()
            .map(|w| (w.clone(), BTreeSet::new()))
            .collect();
        let mut predecessors = successors.clone();
        for (w, v) in &relation {
            successors.entry(w.clone()).or_default().insert(v.clone());
            predecessors.entry(v.clone()).or_default().insert(w.clone());
        }
        Self {
            worlds,
            relation,
            successors,
            predecessors,
        }
    }

    /// The worlds of the frame, in sorted order.
    pub fn worlds(&self) -> impl Iterator<Item = &World> {
        self.worlds.iter()
    }

    /// Look up a world of the frame by name.
    pub fn get(&self, world: &str) -> Option<&World> {
        self.worlds.get(world)
    }

    /// Whether `world` is a world of the frame.
    pub fn contains(&self, world: &str) -> bool {
        self.worlds.contains(world)
    }

    /// The accessibility relation as a set of pairs.
    pub fn relation(&self) -> &BTreeSet<(World, World)> {
        &self.relation
    }

    /// Whether `R(w, v)`.
    pub fn relates(&self, w: &str, v: &str) -> bool {
        self.successors
            .get(w)
            .map_or(false, |successors| successors.contains(v))
    }

    /// The worlds `v` with `R(w, v)`, or `None` if `w` is not a world.
    pub fn successors(&self, w: &str) -> Option<&BTreeSet<World>> {
        self.successors.get(w)
    }

    /// The worlds `v` with `R(v, w)`, or `None` if `w` is not a world.
    pub fn predecessors(&self, w: &str) -> Option<&BTreeSet<World>> {
        self.predecessors.get(w)
    }

    /// The worlds accessible from `w`. Empty for unknown worlds.
    pub fn accessible<'a>(&'a self, w: &str) -> impl Iterator<Item = &'a World> + 'a {
        self.successors(w).into_iter().flatten()
    }

    /// The same frame with its relation replaced by its reflexive-transitive
    /// closure.
    pub fn reflexive_transitive_closure(&self) -> Self {
        Self::from_parts(
            self.worlds.clone(),
            reflexive_transitive_closure(&self.worlds, &self.relation),
        )
    }

    /// Whether every world is related to itself.
    pub fn is_reflexive(&self) -> bool {
        self.worlds.iter().all(|w| self.relates(w, w))
    }

    /// Whether the relation is closed under composition.
    pub fn is_transitive(&self) -> bool {
        self.relation
            .iter()
            .all(|(x, y)| self.accessible(y).all(|z| self.relates(x, z)))
    }
}

/// Compute the reflexive-transitive closure of `relation` over `worlds` by
/// fixed-point iteration: start from the relation plus every `(w, w)`, then
/// add `(x, z)` for every `(x, y)`, `(y, z)` until nothing new is added.
pub fn reflexive_transitive_closure(
    worlds: &BTreeSet<World>,
    relation: &BTreeSet<(World, World)>,
) -> BTreeSet<(World, World)> {
    let mut closure = relation.clone();
    closure.extend(worlds.iter().map(|w| (w.clone(), w.clone())));
    loop {
        let new_pairs = closure
            .iter()
            .cartesian_product(closure.iter())
            .filter(|((_, y1), (y2, _))| y1 == y2)
            .map(|((x, _), (_, z))| (x.clone(), z.clone()))
            .filter(|pair| !closure.contains(pair))
            .collect_vec();
        if new_pairs.is_empty() {
            return closure;
        }
        closure.extend(new_pairs);
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "worlds: {}", self.worlds.iter().join(", "))?;
        writeln!(
            f,
            "accessibility: {{{}}}",
            self.relation
                .iter()
                .map(|(w, v)| format!("({w}, {v})"))
                .join(", ")
        )
    }
}

// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Interpretations of non-logical symbols over a finite domain.

use fol::signature::SymbolKind;
use itertools::Itertools;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Element is the name of an individual of a domain.
pub type Element = String;

/// A domain is a finite set of elements. The sorted order of a `BTreeSet` is
/// the order in which quantifiers try candidates.
pub type Domain = BTreeSet<Element>;

/// An n-ary relation given by the set of tuples it holds of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relation {
    /// The length of every tuple
    pub arity: usize,
    /// The tuples in the relation
    pub tuples: BTreeSet<Vec<Element>>,
}

impl Relation {
    /// Whether the relation holds of `args`.
    pub fn contains(&self, args: &[Element]) -> bool {
        self.tuples.contains(args)
    }
}

/// A finite function given by its table. Argument tuples missing from the
/// table have no value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Function {
    /// The number of arguments
    pub arity: usize,
    /// The value at each argument tuple
    pub table: BTreeMap<Vec<Element>, Element>,
}

impl Function {
    /// Get the function's value for a slice of argument values.
    pub fn get(&self, args: &[Element]) -> Option<&Element> {
        self.table.get(args)
    }
}

/// The meaning an interpretation gives to a single symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Denotation {
    /// The element a constant names
    Individual(Element),
    /// The truth value of a propositional atom (or of a 0-ary predicate)
    Truth(bool),
    /// The extension of a predicate
    Relation(Relation),
    /// The table of a function symbol
    Function(Function),
}

impl Denotation {
    /// Whether this denotation is a suitable meaning for a symbol of the given
    /// kind. A 0-ary predicate may be given either a truth value or a relation
    /// of arity 0.
    pub fn fits(&self, kind: SymbolKind) -> bool {
        match (self, kind) {
            (Denotation::Individual(_), SymbolKind::Constant) => true,
            (Denotation::Truth(_), SymbolKind::Atom | SymbolKind::Predicate(0)) => true,
            (Denotation::Relation(_), SymbolKind::Predicate(_)) => true,
            (Denotation::Function(_), SymbolKind::Function(_)) => true,
            _ => false,
        }
    }

    /// The arity of a relation or function, 0 otherwise.
    pub fn arity(&self) -> usize {
        match self {
            Denotation::Individual(_) | Denotation::Truth(_) => 0,
            Denotation::Relation(r) => r.arity,
            Denotation::Function(f) => f.arity,
        }
    }

    /// Every tuple (or table row, including the output) held by this
    /// denotation.
    pub(crate) fn rows(&self) -> Vec<Vec<&Element>> {
        match self {
            Denotation::Individual(e) => vec![vec![e]],
            Denotation::Truth(_) => vec![],
            Denotation::Relation(r) => r.tuples.iter().map(|t| t.iter().collect()).collect(),
            Denotation::Function(f) => f
                .table
                .iter()
                .map(|(args, v)| args.iter().chain([v]).collect())
                .collect(),
        }
    }
}

/// An interpretation maps each symbol to its denotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Interpretation {
    symbols: BTreeMap<String, Denotation>,
}

fn to_vec<I>(tuple: I) -> Vec<Element>
where
    I: IntoIterator,
    I::Item: Into<Element>,
{
    tuple.into_iter().map(|e| e.into()).collect()
}

impl Interpretation {
    /// An empty interpretation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the denotation of a symbol, replacing any previous one.
    pub fn set(mut self, name: &str, denotation: Denotation) -> Self {
        self.symbols.insert(name.to_string(), denotation);
        self
    }

    /// Interpret a constant.
    pub fn constant(self, name: &str, element: &str) -> Self {
        self.set(name, Denotation::Individual(element.to_string()))
    }

    /// Interpret a propositional atom.
    pub fn atom(self, name: &str, value: bool) -> Self {
        self.set(name, Denotation::Truth(value))
    }

    /// Interpret a predicate by the tuples it holds of. Every tuple must have
    /// length `arity`, which is checked when the model is built.
    pub fn predicate<I, T>(self, name: &str, arity: usize, tuples: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator,
        T::Item: Into<Element>,
    {
        let tuples = tuples.into_iter().map(to_vec).collect();
        self.set(name, Denotation::Relation(Relation { arity, tuples }))
    }

    /// Interpret a 0-ary predicate: `{()}` when `holds`, otherwise `{}`.
    pub fn nullary(self, name: &str, holds: bool) -> Self {
        let tuples = if holds {
            BTreeSet::from([vec![]])
        } else {
            BTreeSet::new()
        };
        self.set(name, Denotation::Relation(Relation { arity: 0, tuples }))
    }

    /// Interpret a function symbol by its table.
    pub fn function<I, T, V>(self, name: &str, arity: usize, entries: I) -> Self
    where
        I: IntoIterator<Item = (T, V)>,
        T: IntoIterator,
        T::Item: Into<Element>,
        V: Into<Element>,
    {
        let table = entries
            .into_iter()
            .map(|(args, value)| (to_vec(args), value.into()))
            .collect();
        self.set(name, Denotation::Function(Function { arity, table }))
    }

    /// Get the denotation of a symbol.
    pub fn get(&self, name: &str) -> Option<&Denotation> {
        self.symbols.get(name)
    }

    /// All interpreted symbols, in sorted order.
    pub fn symbols(&self) -> impl Iterator<Item = (&String, &Denotation)> {
        self.symbols.iter()
    }
}

fn fmt_tuple<'a>(t: impl IntoIterator<Item = &'a Element>) -> String {
    format!("({})", t.into_iter().join(", "))
}

impl fmt::Display for Denotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denotation::Individual(e) => write!(f, "{e}"),
            Denotation::Truth(b) => write!(f, "{b}"),
            Denotation::Relation(r) => {
                write!(f, "{{{}}}", r.tuples.iter().map(fmt_tuple).join(", "))
            }
            Denotation::Function(func) => write!(
                f,
                "{{{}}}",
                func.table
                    .iter()
                    .map(|(args, v)| format!("{} -> {v}", fmt_tuple(args)))
                    .join(", ")
            ),
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, denotation) in &self.symbols {
            writeln!(f, "{name} = {denotation}")?;
        }
        Ok(())
    }
}

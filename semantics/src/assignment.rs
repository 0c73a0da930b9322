// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Variable assignments and their lazy enumeration.

use itertools::{Itertools, MultiProduct};
use std::collections::{btree_set, BTreeSet};

use crate::interp::{Domain, Element};

/// An assignment maps variable names to elements of a domain.
///
/// This is a persistent map, so an x-variant `a.update(x, d)` shares structure
/// with `a` and leaves it untouched.
pub type Assignment = im::OrdMap<String, Element>;

enum Product<'a> {
    // itertools yields nothing for the product of zero iterators, while the
    // product we want has exactly one (empty) tuple
    NoVariables { done: bool },
    Elements(MultiProduct<btree_set::Iter<'a, Element>>),
}

/// Every total map from a list of variables to a domain, generated lazily.
///
/// Maps come in lexicographic order of the sorted domain, with the first
/// variable varying slowest. There are exactly `|D|^|V|` of them: a single
/// empty map when there are no variables, and none at all when there are
/// variables but the domain is empty.
pub struct Assignments<'a> {
    vars: Vec<String>,
    product: Product<'a>,
}

impl<'a> Assignments<'a> {
    /// Enumerate assignments of `vars` to elements of `domain`. Repeated
    /// variables are assigned once.
    pub fn new<I>(vars: I, domain: &'a Domain) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let vars = vars.into_iter().map(|v| v.into()).unique().collect_vec();
        let product = if vars.is_empty() {
            Product::NoVariables { done: false }
        } else {
            Product::Elements(
                vars.iter()
                    .map(|_| domain.iter())
                    .multi_cartesian_product(),
            )
        };
        Self { vars, product }
    }

    /// The variables being assigned.
    pub fn vars(&self) -> &[String] {
        &self.vars
    }
}

impl<'a> Iterator for Assignments<'a> {
    type Item = Assignment;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.product {
            Product::NoVariables { done } => {
                if *done {
                    None
                } else {
                    *done = true;
                    Some(Assignment::new())
                }
            }
            Product::Elements(iter) => iter.next().map(|elements| {
                self.vars
                    .iter()
                    .cloned()
                    .zip(elements.into_iter().cloned())
                    .collect()
            }),
        }
    }
}

/// The part of `assignment` that gives values to `vars`.
pub fn restrict(assignment: &Assignment, vars: &BTreeSet<String>) -> Assignment {
    assignment
        .iter()
        .filter(|(x, _)| vars.contains(*x))
        .map(|(x, d)| (x.clone(), d.clone()))
        .collect()
}

/// Print an assignment as `{x := a, y := b}`.
pub fn fmt_assignment(assignment: &Assignment) -> String {
    format!(
        "{{{}}}",
        assignment
            .iter()
            .map(|(x, d)| format!("{x} := {d}"))
            .join(", ")
    )
}

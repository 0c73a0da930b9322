// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Perform substitutions of variables by terms.
//!
//! Substitution here is capture-naive: a term substituted under a quantifier
//! is not renamed apart from the quantifier's binder. The evaluator only ever
//! substitutes ground terms, for which this is harmless; callers substituting
//! open terms must rename binders themselves first.

use std::collections::HashMap;

use crate::syntax::{Formula, Term};

/// A map from variable names to Terms.
pub type Substitution = HashMap<String, Term>;

impl Term {
    /// Replace every occurrence of the variable `var` with `t`.
    pub fn subst(&self, var: &str, t: &Term) -> Term {
        match self {
            Term::Var(x) if x == var => t.clone(),
            Term::Const(_) | Term::Var(_) => self.clone(),
            Term::App(f, args) => {
                Term::App(f.clone(), args.iter().map(|a| a.subst(var, t)).collect())
            }
        }
    }
}

impl Formula {
    /// Replace every free occurrence of the variable `var` with `t`.
    ///
    /// A quantifier binding `var` is left unchanged; any other quantifier is
    /// kept and the substitution continues into its body.
    pub fn subst(&self, var: &str, t: &Term) -> Formula {
        let mut substitution = Substitution::new();
        substitution.insert(var.to_string(), t.clone());
        substitute(self, &substitution)
    }
}

/// Perform a simultaneous substitution of free variables.
pub fn substitute(formula: &Formula, substitution: &Substitution) -> Formula {
    substitute_rec(formula, substitution, &im::HashSet::new())
}

fn substitute_term(
    term: &Term,
    substitution: &Substitution,
    bound_vars: &im::HashSet<String>,
) -> Term {
    match term {
        Term::Const(_) => term.clone(),
        Term::Var(s) => {
            if !bound_vars.contains(s) && substitution.contains_key(s) {
                substitution[s].clone()
            } else {
                term.clone()
            }
        }
        Term::App(f, args) => Term::App(
            f.clone(),
            args.iter()
                .map(|a| substitute_term(a, substitution, bound_vars))
                .collect(),
        ),
    }
}

/// Perform a substitution, accounting for the given bound variables
fn substitute_rec(
    formula: &Formula,
    substitution: &Substitution,
    bound_vars: &im::HashSet<String>,
) -> Formula {
    match formula {
        Formula::Literal(_) | Formula::Atom(_) => formula.clone(),

        Formula::Equals(lhs, rhs) => Formula::Equals(
            substitute_term(lhs, substitution, bound_vars),
            substitute_term(rhs, substitution, bound_vars),
        ),

        Formula::Pred(p, args) => Formula::Pred(
            p.clone(),
            args.iter()
                .map(|a| substitute_term(a, substitution, bound_vars))
                .collect(),
        ),

        Formula::UnaryOp(op, arg) => Formula::UnaryOp(
            *op,
            Box::new(substitute_rec(arg, substitution, bound_vars)),
        ),

        Formula::BinOp(op, arg1, arg2) => Formula::BinOp(
            *op,
            Box::new(substitute_rec(arg1, substitution, bound_vars)),
            Box::new(substitute_rec(arg2, substitution, bound_vars)),
        ),

        Formula::Quantified {
            quantifier,
            binder,
            body,
        } => Formula::Quantified {
            quantifier: *quantifier,
            binder: binder.clone(),
            body: Box::new(substitute_rec(
                body,
                substitution,
                &bound_vars.update(binder.clone()),
            )),
        },
    }
}

#[cfg(test)]
#[allow(clippy::redundant_clone)]
mod tests {
    use super::*;

    fn p(t: Term) -> Formula {
        Formula::pred("P", [t])
    }

    #[test]
    fn test_subst_qf() {
        let x = Term::var("x");
        let y = Term::var("y");
        let c = Term::constant("c");

        // (P(x) | Q) -> !x = y
        let f = Formula::implies(
            Formula::or(p(x.clone()), Formula::atom("Q")),
            Formula::not_equals(x.clone(), y.clone()),
        );
        let f_subx = Formula::implies(
            Formula::or(p(c.clone()), Formula::atom("Q")),
            Formula::not_equals(c.clone(), y.clone()),
        );
        assert_eq!(f.subst("x", &c), f_subx);
        assert_eq!(f.subst("z", &c), f);

        let mut subt = Substitution::new();
        subt.insert("x".to_string(), y.clone());
        subt.insert("y".to_string(), x.clone());
        assert_eq!(
            substitute(&f, &subt),
            Formula::implies(
                Formula::or(p(y.clone()), Formula::atom("Q")),
                Formula::not_equals(y.clone(), x.clone()),
            )
        );
    }

    #[test]
    fn test_subst_function_terms() {
        let t = Term::app("f", [Term::var("x"), Term::app("g", [Term::var("x")])]);
        assert_eq!(
            t.subst("x", &Term::constant("a")),
            Term::app("f", [Term::constant("a"), Term::app("g", [Term::constant("a")])])
        );
    }

    #[test]
    fn test_subst_binder_is_opaque() {
        let f = Formula::forall("x", p(Term::var("x")));
        assert_eq!(f.subst("x", &Term::constant("c")), f);
    }

    #[test]
    fn test_subst_keeps_quantifier() {
        let f = Formula::exists("y", Formula::equals(Term::var("x"), Term::var("y")));
        assert_eq!(
            f.subst("x", &Term::constant("c")),
            Formula::exists("y", Formula::equals(Term::constant("c"), Term::var("y")))
        );
    }

    #[test]
    fn test_subst_keeps_modal_operator() {
        let c = Term::constant("c");
        let nec = Formula::necessarily(p(Term::var("x")));
        assert_eq!(nec.subst("x", &c), Formula::necessarily(p(c.clone())));
        let pos = Formula::possibly(p(Term::var("x")));
        assert_eq!(pos.subst("x", &c), Formula::possibly(p(c)));
    }

    #[test]
    fn test_subst_roundtrip() {
        // x is free, y does not occur
        let f = Formula::and(
            p(Term::var("x")),
            Formula::forall("z", Formula::equals(Term::var("x"), Term::var("z"))),
        );
        let there = f.subst("x", &Term::var("y"));
        assert_ne!(there, f);
        assert_eq!(there.subst("y", &Term::var("x")), f);
    }
}

// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! The AST for first-order terms and formulas with modal operators.

use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeSet;

/// A first-order term.
///
/// Arity of an application is implicit in the length of its argument list and
/// is only checked against a [`crate::signature::Signature`] or a model.
#[derive(PartialEq, Eq, Clone, Debug, Hash, PartialOrd, Ord, Serialize)]
pub enum Term {
    /// A constant symbol, interpreted by the model
    Const(String),
    /// A variable, given a value by an assignment
    Var(String),
    /// Application. `App(f, args)` represents applying the function symbol `f`
    /// to `args`.
    App(String, Vec<Term>),
}

/// Unary operators
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, PartialOrd, Ord, Serialize)]
pub enum UOp {
    /// Negation
    Not,
    /// Modal possibility (diamond)
    Possibly,
    /// Modal necessity (box)
    Necessarily,
}

/// Binary connectives
#[allow(missing_docs)]
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, PartialOrd, Ord, Serialize)]
pub enum BinOp {
    And,
    Or,
    Implies,
    Iff,
}

/// A kind of quantifier (forall or exists)
#[allow(missing_docs)]
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, PartialOrd, Ord, Serialize)]
pub enum Quantifier {
    Forall,
    Exists,
}

/// A first-order formula, possibly with modal operators.
///
/// Propositional atoms and predicate applications are distinct: an atom
/// denotes a truth value directly, while a predicate denotes a relation that
/// its (possibly empty) argument tuple is checked against.
#[derive(PartialEq, Eq, Clone, Debug, Hash, PartialOrd, Ord, Serialize)]
pub enum Formula {
    /// A constant true or false
    Literal(bool),
    /// A propositional atom
    Atom(String),
    /// Equality of two terms
    Equals(Term, Term),
    /// Predicate application. `Pred(p, args)` may have no arguments.
    Pred(String, Vec<Term>),
    /// An applied unary operation
    UnaryOp(UOp, Box<Formula>),
    /// An applied binary connective
    BinOp(BinOp, Box<Formula>, Box<Formula>),
    /// A quantifier binding a single variable in its body.
    #[allow(missing_docs)]
    Quantified {
        quantifier: Quantifier,
        binder: String,
        body: Box<Formula>,
    },
}

impl From<&Term> for Term {
    /// This is mostly for smart constructors, making it possible to pass
    /// either Term or &Term with an automatic clone if needed
    fn from(value: &Self) -> Self {
        value.clone()
    }
}

impl From<&Formula> for Formula {
    /// See `From<&Term> for Term`
    fn from(value: &Self) -> Self {
        value.clone()
    }
}

/// Smart constructors for Term. These take names by reference and clone them.
impl Term {
    /// Smart constructor for Const
    pub fn constant(name: &str) -> Self {
        Self::Const(name.to_string())
    }

    /// Smart constructor for Var
    pub fn var(name: &str) -> Self {
        Self::Var(name.to_string())
    }

    /// Smart constructor for function application
    pub fn app<I>(f: &str, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        Self::App(f.to_string(), args.into_iter().map(|x| x.into()).collect())
    }
}

/// Utilities for getting information about a given [`Term`]
impl Term {
    /// Variables occurring in the term. Terms bind nothing, so every variable
    /// occurrence is free.
    pub fn free_vars(&self) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        self.collect_vars(&mut vars);
        vars
    }

    /// Terms have no binders; this is always empty.
    pub fn bound_vars(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    fn collect_vars(&self, vars: &mut BTreeSet<String>) {
        match self {
            Term::Const(_) => (),
            Term::Var(x) => {
                vars.insert(x.clone());
            }
            Term::App(_, args) => {
                for arg in args {
                    arg.collect_vars(vars);
                }
            }
        }
    }

    /// Whether the term mentions no variables.
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Const(_) => true,
            Term::Var(_) => false,
            Term::App(_, args) => args.iter().all(Term::is_ground),
        }
    }
}

/// Smart constructors for Formula. These generally take arguments by reference
/// and clone them.
impl Formula {
    /// Smart constructor for Literal(true)
    pub fn true_() -> Self {
        Self::Literal(true)
    }

    /// Smart constructor for Literal(false)
    pub fn false_() -> Self {
        Self::Literal(false)
    }

    /// Smart constructor for a propositional atom
    pub fn atom(name: &str) -> Self {
        Self::Atom(name.to_string())
    }

    /// Smart constructor for predicate application
    pub fn pred<I>(p: &str, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        Self::Pred(p.to_string(), args.into_iter().map(|x| x.into()).collect())
    }

    /// Smart constructor for `lhs = rhs`
    pub fn equals<T1, T2>(lhs: T1, rhs: T2) -> Self
    where
        T1: Into<Term>,
        T2: Into<Term>,
    {
        Self::Equals(lhs.into(), rhs.into())
    }

    /// Smart constructor for `lhs != rhs`, which is sugar for `!(lhs = rhs)`
    pub fn not_equals<T1, T2>(lhs: T1, rhs: T2) -> Self
    where
        T1: Into<Term>,
        T2: Into<Term>,
    {
        Self::not(Self::equals(lhs, rhs))
    }

    //////////////////
    // Unary operations: Not, Possibly, Necessarily
    //////////////////

    /// Smart constructor for not. Unlike a classical simplifier this does not
    /// cancel double negation, which is not valid intuitionistically.
    pub fn not<T>(t: T) -> Self
    where
        T: Into<Formula>,
    {
        Self::UnaryOp(UOp::Not, Box::new(t.into()))
    }

    /// Smart constructor for `<> t`
    pub fn possibly<T>(t: T) -> Self
    where
        T: Into<Formula>,
    {
        Self::UnaryOp(UOp::Possibly, Box::new(t.into()))
    }

    /// Smart constructor for `[] t`
    pub fn necessarily<T>(t: T) -> Self
    where
        T: Into<Formula>,
    {
        Self::UnaryOp(UOp::Necessarily, Box::new(t.into()))
    }

    //////////////////
    // Binary operations: And, Or, Implies, Iff
    //////////////////

    fn binop<T1, T2>(op: BinOp, lhs: T1, rhs: T2) -> Self
    where
        T1: Into<Formula>,
        T2: Into<Formula>,
    {
        Self::BinOp(op, Box::new(lhs.into()), Box::new(rhs.into()))
    }

    /// Smart constructor for `lhs & rhs`
    pub fn and<T1, T2>(lhs: T1, rhs: T2) -> Self
    where
        T1: Into<Formula>,
        T2: Into<Formula>,
    {
        Self::binop(BinOp::And, lhs, rhs)
    }

    /// Smart constructor for `lhs | rhs`
    pub fn or<T1, T2>(lhs: T1, rhs: T2) -> Self
    where
        T1: Into<Formula>,
        T2: Into<Formula>,
    {
        Self::binop(BinOp::Or, lhs, rhs)
    }

    /// Smart constructor for `lhs -> rhs`
    pub fn implies<T1, T2>(lhs: T1, rhs: T2) -> Self
    where
        T1: Into<Formula>,
        T2: Into<Formula>,
    {
        Self::binop(BinOp::Implies, lhs, rhs)
    }

    /// Smart constructor for `lhs <-> rhs`
    pub fn iff<T1, T2>(lhs: T1, rhs: T2) -> Self
    where
        T1: Into<Formula>,
        T2: Into<Formula>,
    {
        Self::binop(BinOp::Iff, lhs, rhs)
    }

    /// Conjunction of any number of formulas, associated to the right. Zero
    /// conjuncts give `true` and a single conjunct is returned as is.
    pub fn conjoin<I>(fs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Formula>,
    {
        let fs = fs.into_iter().map(|x| x.into()).collect_vec();
        fs.into_iter()
            .rev()
            .reduce(|acc, f| Self::and(f, acc))
            .unwrap_or_else(Self::true_)
    }

    /// Disjunction of any number of formulas, associated to the right. Zero
    /// disjuncts give `false`.
    pub fn disjoin<I>(fs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Formula>,
    {
        let fs = fs.into_iter().map(|x| x.into()).collect_vec();
        fs.into_iter()
            .rev()
            .reduce(|acc, f| Self::or(f, acc))
            .unwrap_or_else(Self::false_)
    }

    //////////////////
    // Quantifiers
    //////////////////

    fn quantify<T>(quantifier: Quantifier, binder: &str, body: T) -> Self
    where
        T: Into<Formula>,
    {
        Self::Quantified {
            quantifier,
            binder: binder.to_string(),
            body: Box::new(body.into()),
        }
    }

    /// Smart constructor for `forall binder. body`
    pub fn forall<T>(binder: &str, body: T) -> Self
    where
        T: Into<Formula>,
    {
        Self::quantify(Quantifier::Forall, binder, body)
    }

    /// Smart constructor for `exists binder. body`
    pub fn exists<T>(binder: &str, body: T) -> Self
    where
        T: Into<Formula>,
    {
        Self::quantify(Quantifier::Exists, binder, body)
    }

    /// Quantify over several binders, outermost first.
    pub fn forall_many<T>(binders: &[&str], body: T) -> Self
    where
        T: Into<Formula>,
    {
        binders
            .iter()
            .rev()
            .fold(body.into(), |acc, b| Self::forall(b, acc))
    }

    /// Quantify over several binders, outermost first.
    pub fn exists_many<T>(binders: &[&str], body: T) -> Self
    where
        T: Into<Formula>,
    {
        binders
            .iter()
            .rev()
            .fold(body.into(), |acc, b| Self::exists(b, acc))
    }
}

/// Utilities for getting information about a given [`Formula`]
impl Formula {
    /// Variables with a free occurrence in the formula: an occurrence not
    /// under a quantifier binding it.
    pub fn free_vars(&self) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        self.free_vars_rec(&im::HashSet::new(), &mut vars);
        vars
    }

    fn free_vars_rec(&self, bound: &im::HashSet<String>, vars: &mut BTreeSet<String>) {
        fn term(t: &Term, bound: &im::HashSet<String>, vars: &mut BTreeSet<String>) {
            vars.extend(t.free_vars().into_iter().filter(|x| !bound.contains(x)));
        }

        match self {
            Formula::Literal(_) | Formula::Atom(_) => (),
            Formula::Equals(lhs, rhs) => {
                term(lhs, bound, vars);
                term(rhs, bound, vars);
            }
            Formula::Pred(_, args) => {
                for arg in args {
                    term(arg, bound, vars);
                }
            }
            Formula::UnaryOp(_, body) => body.free_vars_rec(bound, vars),
            Formula::BinOp(_, lhs, rhs) => {
                lhs.free_vars_rec(bound, vars);
                rhs.free_vars_rec(bound, vars);
            }
            Formula::Quantified { binder, body, .. } => {
                body.free_vars_rec(&bound.update(binder.clone()), vars)
            }
        }
    }

    /// Variables bound by some quantifier in the formula.
    pub fn bound_vars(&self) -> BTreeSet<String> {
        match self {
            Formula::Literal(_)
            | Formula::Atom(_)
            | Formula::Equals(_, _)
            | Formula::Pred(_, _) => BTreeSet::new(),
            Formula::UnaryOp(_, body) => body.bound_vars(),
            Formula::BinOp(_, lhs, rhs) => {
                let mut vars = lhs.bound_vars();
                vars.extend(rhs.bound_vars());
                vars
            }
            Formula::Quantified { binder, body, .. } => {
                let mut vars = body.bound_vars();
                vars.insert(binder.clone());
                vars
            }
        }
    }

    /// All variables occurring in the formula, free or bound.
    pub fn vars(&self) -> BTreeSet<String> {
        let mut vars = self.free_vars();
        vars.extend(self.bound_vars());
        vars
    }

    /// Whether the formula has no free variables.
    pub fn is_closed(&self) -> bool {
        self.free_vars().is_empty()
    }

    /// Whether the formula contains a modal operator.
    pub fn is_modal(&self) -> bool {
        match self {
            Formula::Literal(_)
            | Formula::Atom(_)
            | Formula::Equals(_, _)
            | Formula::Pred(_, _) => false,
            Formula::UnaryOp(UOp::Possibly | UOp::Necessarily, _) => true,
            Formula::UnaryOp(UOp::Not, body) => body.is_modal(),
            Formula::BinOp(_, lhs, rhs) => lhs.is_modal() || rhs.is_modal(),
            Formula::Quantified { body, .. } => body.is_modal(),
        }
    }

    /// Return the number of atomic formulas in the formula.
    pub fn size(&self) -> usize {
        match self {
            Formula::Literal(_)
            | Formula::Atom(_)
            | Formula::Equals(_, _)
            | Formula::Pred(_, _) => 1,
            Formula::UnaryOp(_, f) => f.size(),
            Formula::BinOp(_, f1, f2) => f1.size() + f2.size(),
            Formula::Quantified { body, .. } => body.size(),
        }
    }
}

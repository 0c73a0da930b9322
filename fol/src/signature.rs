// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Declarations of non-logical symbols, and checking terms and formulas
//! against them.
//!
//! The main entry points are [`Signature::check_formula`] and the validating
//! constructors [`Signature::app`] and [`Signature::pred`].

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::syntax::*;

/// What kind of non-logical symbol a name is.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, PartialOrd, Ord, Serialize)]
pub enum SymbolKind {
    /// An individual constant
    Constant,
    /// A function symbol of the given arity
    Function(usize),
    /// A predicate symbol of the given arity (possibly 0)
    Predicate(usize),
    /// A propositional atom
    Atom,
}

impl SymbolKind {
    /// The number of arguments an application of this symbol takes.
    pub fn arity(&self) -> usize {
        match self {
            SymbolKind::Constant | SymbolKind::Atom => 0,
            SymbolKind::Function(n) | SymbolKind::Predicate(n) => *n,
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Constant => write!(f, "constant"),
            SymbolKind::Function(n) => write!(f, "{n}-ary function"),
            SymbolKind::Predicate(n) => write!(f, "{n}-ary predicate"),
            SymbolKind::Atom => write!(f, "atom"),
        }
    }
}

/// The declaration of a single symbol as part of a Signature
#[derive(PartialEq, Eq, Clone, Debug, Serialize, Hash)]
pub struct SymbolDecl {
    /// The name of the symbol
    pub name: String,
    /// What the symbol denotes
    pub kind: SymbolKind,
}

/// A Signature defines the language of a model: the constants, functions,
/// predicates and atoms its interpretations must give meaning to.
#[derive(PartialEq, Eq, Clone, Debug, Default, Serialize, Hash)]
pub struct Signature {
    /// Declarations for symbols, in declaration order
    pub symbols: Vec<SymbolDecl>,
}

/// An error encountered while checking a term or formula against a signature
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// The term or formula referred to a symbol that was not declared.
    #[error("unknown symbol {0}")]
    UnknownSymbol(String),
    /// A symbol was declared multiple times.
    #[error("{0} was declared multiple times")]
    RedeclaredSymbol(String),
    /// A symbol was used as something other than what it was declared as.
    #[allow(missing_docs)]
    #[error("{symbol} is a {declared} but was used as a {used}")]
    KindMismatch {
        symbol: String,
        declared: SymbolKind,
        used: SymbolKind,
    },
    /// A function or predicate was applied to the wrong number of arguments.
    #[allow(missing_docs)]
    #[error("{symbol} expected {expected} args but found {actual} args")]
    ArityMismatch {
        symbol: String,
        expected: usize,
        actual: usize,
    },
}

impl Signature {
    /// An empty signature.
    pub fn new() -> Self {
        Self::default()
    }

    fn declare(mut self, name: &str, kind: SymbolKind) -> Self {
        self.symbols.push(SymbolDecl {
            name: name.to_string(),
            kind,
        });
        self
    }

    /// Declare an individual constant.
    pub fn constant(self, name: &str) -> Self {
        self.declare(name, SymbolKind::Constant)
    }

    /// Declare a function symbol.
    pub fn function(self, name: &str, arity: usize) -> Self {
        self.declare(name, SymbolKind::Function(arity))
    }

    /// Declare a predicate symbol.
    pub fn predicate(self, name: &str, arity: usize) -> Self {
        self.declare(name, SymbolKind::Predicate(arity))
    }

    /// Declare a propositional atom.
    pub fn atom(self, name: &str) -> Self {
        self.declare(name, SymbolKind::Atom)
    }

    /// Get the declaration for a given name.
    pub fn symbol_decl(&self, name: &str) -> Option<&SymbolDecl> {
        self.symbols.iter().find(|x| x.name == name)
    }

    /// Check if `name` is declared in the signature.
    pub fn contains_symbol(&self, name: &str) -> bool {
        self.symbol_decl(name).is_some()
    }

    /// Check that no symbol is declared twice.
    pub fn check(&self) -> Result<(), SyntaxError> {
        for (i, decl) in self.symbols.iter().enumerate() {
            if self.symbols[..i].iter().any(|d| d.name == decl.name) {
                return Err(SyntaxError::RedeclaredSymbol(decl.name.clone()));
            }
        }
        Ok(())
    }

    fn check_use(&self, name: &str, used: SymbolKind) -> Result<(), SyntaxError> {
        let decl = self
            .symbol_decl(name)
            .ok_or_else(|| SyntaxError::UnknownSymbol(name.to_string()))?;
        let same_kind = matches!(
            (decl.kind, used),
            (SymbolKind::Constant, SymbolKind::Constant)
                | (SymbolKind::Atom, SymbolKind::Atom)
                | (SymbolKind::Function(_), SymbolKind::Function(_))
                | (SymbolKind::Predicate(_), SymbolKind::Predicate(_))
        );
        if !same_kind {
            return Err(SyntaxError::KindMismatch {
                symbol: name.to_string(),
                declared: decl.kind,
                used,
            });
        }
        if decl.kind.arity() != used.arity() {
            return Err(SyntaxError::ArityMismatch {
                symbol: name.to_string(),
                expected: decl.kind.arity(),
                actual: used.arity(),
            });
        }
        Ok(())
    }

    /// Check that every symbol in the term is declared and applied with its
    /// declared arity.
    pub fn check_term(&self, term: &Term) -> Result<(), SyntaxError> {
        match term {
            Term::Var(_) => Ok(()),
            Term::Const(c) => self.check_use(c, SymbolKind::Constant),
            Term::App(f, args) => {
                self.check_use(f, SymbolKind::Function(args.len()))?;
                args.iter().try_for_each(|a| self.check_term(a))
            }
        }
    }

    /// Check that every symbol in the formula is declared and applied with its
    /// declared arity.
    pub fn check_formula(&self, formula: &Formula) -> Result<(), SyntaxError> {
        match formula {
            Formula::Literal(_) => Ok(()),
            Formula::Atom(p) => self.check_use(p, SymbolKind::Atom),
            Formula::Equals(lhs, rhs) => {
                self.check_term(lhs)?;
                self.check_term(rhs)
            }
            Formula::Pred(p, args) => {
                self.check_use(p, SymbolKind::Predicate(args.len()))?;
                args.iter().try_for_each(|a| self.check_term(a))
            }
            Formula::UnaryOp(_, body) => self.check_formula(body),
            Formula::BinOp(_, lhs, rhs) => {
                self.check_formula(lhs)?;
                self.check_formula(rhs)
            }
            Formula::Quantified { body, .. } => self.check_formula(body),
        }
    }

    /// Validating constructor for function application.
    pub fn app<I>(&self, f: &str, args: I) -> Result<Term, SyntaxError>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        let t = Term::app(f, args);
        self.check_term(&t)?;
        Ok(t)
    }

    /// Validating constructor for predicate application.
    pub fn pred<I>(&self, p: &str, args: I) -> Result<Formula, SyntaxError>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        let f = Formula::pred(p, args);
        self.check_formula(&f)?;
        Ok(f)
    }
}

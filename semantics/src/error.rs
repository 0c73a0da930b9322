// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Error types for model construction and evaluation.

use fol::signature::{SymbolKind, SyntaxError};
use thiserror::Error;

use crate::interp::Element;
use crate::frame::World;

fn at(world: &Option<World>) -> String {
    match world {
        Some(w) => format!(" at {w}"),
        None => String::new(),
    }
}

/// The reasons evaluation of a term or formula can fail. Evaluation stops at
/// the first error; there are no partial results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A name used in the formula has no entry in the interpretation.
    #[allow(missing_docs)]
    #[error("undefined symbol {symbol}{}", at(.world))]
    UndefinedSymbol {
        symbol: String,
        world: Option<World>,
    },
    /// A function's table has no value for the given arguments.
    #[allow(missing_docs)]
    #[error("{symbol}({}) is undefined{}", .args.join(", "), at(.world))]
    UndefinedValue {
        symbol: String,
        args: Vec<Element>,
        world: Option<World>,
    },
    /// A function or predicate was applied to the wrong number of arguments.
    #[allow(missing_docs)]
    #[error("{symbol} expected {expected} args but found {actual} args")]
    ArityMismatch {
        symbol: String,
        expected: usize,
        actual: usize,
    },
    /// A symbol was interpreted as something other than how it is used.
    #[allow(missing_docs)]
    #[error("{symbol} is used as a {expected} but is not interpreted as one{}", at(.world))]
    KindMismatch {
        symbol: String,
        expected: SymbolKind,
        world: Option<World>,
    },
    /// A world argument is not one of the model's worlds.
    #[allow(missing_docs)]
    #[error("unknown world {world}")]
    UnknownWorld { world: World },
    /// A state argument is not one of the Kripke model's states.
    #[allow(missing_docs)]
    #[error("unknown state {state}")]
    UnknownState { state: World },
    /// A modal model was evaluated without saying at which world.
    #[error("evaluating in a modal model requires a world")]
    WorldRequired,
    /// A free variable has no value in the assignment.
    #[allow(missing_docs)]
    #[error("variable {variable} is not assigned")]
    MissingAssignment { variable: String },
    /// The host cancelled evaluation.
    #[error("evaluation was cancelled")]
    Cancelled,
}

/// The reasons a model can be rejected at construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// See [`SyntaxError`]
    #[error("{0}")]
    Signature(#[from] SyntaxError),
    /// A symbol of the signature has no interpretation.
    #[allow(missing_docs)]
    #[error("no interpretation for {symbol}{}", at(.world))]
    MissingInterpretation {
        symbol: String,
        world: Option<World>,
    },
    /// A symbol is interpreted as something other than its declaration.
    #[allow(missing_docs)]
    #[error("{symbol} is declared as a {expected} but interpreted otherwise{}", at(.world))]
    KindMismatch {
        symbol: String,
        expected: SymbolKind,
        world: Option<World>,
    },
    /// A tuple in a relation or function table has the wrong length.
    #[allow(missing_docs)]
    #[error("{symbol} expected {expected} args but has a {actual}-tuple{}", at(.world))]
    ArityMismatch {
        symbol: String,
        expected: usize,
        actual: usize,
        world: Option<World>,
    },
    /// An interpretation mentions an element outside the domain.
    #[allow(missing_docs)]
    #[error("{symbol} mentions {element}, which is not in the domain{}", at(.world))]
    ElementNotInDomain {
        symbol: String,
        element: Element,
        world: Option<World>,
    },
    /// A world is mentioned that the frame does not contain.
    #[error("unknown world {0}")]
    UnknownWorld(World),
    /// A world of the frame has no domain.
    #[error("no domain for world {0}")]
    MissingDomain(World),
    /// A world of the frame has no interpretation.
    #[error("no interpretation for world {0}")]
    MissingWorldInterpretation(World),
    /// The designated root state of a Kripke model does not exist.
    #[error("root state {0} is not a state of the model")]
    MissingRoot(World),
}

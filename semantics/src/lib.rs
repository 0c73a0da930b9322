// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Evaluate first-order formulas in finite models under classical,
//! intuitionistic (Kripke) and modal semantics.
//!
//! Build a [`Model`] from one of the shapes in [`model`], then use
//! [`denote`] for the value of a formula under an assignment at a world, or
//! the wrappers in [`truth`] for truth in the model. An [`Evaluator`] with a
//! [`trace::TraceSink`] records how quantifiers and modal operators were
//! decided.

// configure clippy
#![allow(clippy::needless_return)]
#![deny(clippy::uninlined_format_args)]
// documentation-related lints (only checked when running rustdoc)
#![warn(missing_docs)]
#![allow(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod assignment;
pub mod conf;
pub mod denote;
pub mod error;
pub mod frame;
pub mod interp;
pub mod model;
pub mod trace;
pub mod truth;

pub use assignment::{Assignment, Assignments};
pub use conf::{CancelToken, EvalConf};
pub use denote::{denote, denote_term, Evaluator};
pub use error::{EvalError, ModelError};
pub use frame::{Frame, World};
pub use interp::{Denotation, Domain, Element, Interpretation};
pub use model::{ClassicalModel, KripkeModel, Logic, ModalModel, Model, VaryingModel};
pub use truth::{counterexample, true_at, true_in_model, true_under, Counterexample};

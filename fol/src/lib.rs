// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! First-order and modal formulas: syntax, printing, variables and
//! substitution.

// configure clippy
#![allow(clippy::needless_return)]
#![allow(clippy::should_implement_trait)]
#![deny(clippy::uninlined_format_args)]
// documentation-related lints (only checked when running rustdoc)
#![warn(missing_docs)]
#![allow(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod printer;
pub mod signature;
pub mod subst;
pub mod syntax;

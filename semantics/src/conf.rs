// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Holds the configuration of an evaluation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::EvalError;

/// A flag a host can use to cancel a running evaluation, for example from a
/// timeout thread. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that has not been canceled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every evaluation holding a clone of this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check if the token has been canceled.
    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options controlling an evaluation.
#[derive(Debug, Clone)]
pub struct EvalConf {
    /// Whether truth-in-model wrappers restrict assignments to the variables
    /// occurring in the formula (and evaluate closed formulas only once).
    pub restrict_assignments: bool,
    /// Optional token polled at every recursive step and loop iteration
    pub cancel: Option<CancelToken>,
}

impl Default for EvalConf {
    fn default() -> Self {
        Self {
            restrict_assignments: true,
            cancel: None,
        }
    }
}

impl EvalConf {
    /// Use the given token for cancellation.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Fail with [`EvalError::Cancelled`] if the token has been canceled.
    pub fn check_canceled(&self) -> Result<(), EvalError> {
        match &self.cancel {
            Some(token) if token.is_canceled() => Err(EvalError::Cancelled),
            _ => Ok(()),
        }
    }
}

// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Structured trace events emitted by the evaluator, and sinks that receive
//! them.
//!
//! Quantifiers and modal operators report when they are entered, each
//! candidate element or world they try (as a `Pick` when it agrees with the
//! search, a `Reject` otherwise), and their verdict. A presenter can render
//! these as a derivation.
//!
//! Events borrow from the evaluation and are only built when
//! [`TraceSink::enabled`] returns true, so [`NoTrace`] costs nothing.

use fol::syntax::Formula;
use itertools::Itertools;
use serde::Serialize;
use std::fmt;

use crate::assignment::{fmt_assignment, Assignment};
use crate::frame::World;
use crate::interp::Element;

/// Where in the evaluation of a node an event is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Evaluation of the node starts.
    Enter,
    /// A candidate settles the search: a witness for `exists` or `<>`, a
    /// counter-witness for `forall` or `[]`.
    Pick,
    /// A candidate was tried and the search goes on.
    Reject,
    /// The node's value is known.
    Verdict,
}

/// The element or world a candidate event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Candidate<'a> {
    #[allow(missing_docs)]
    Element(&'a Element),
    #[allow(missing_docs)]
    World(&'a World),
}

/// A single trace event.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent<'a> {
    /// The quantified or modal formula being evaluated
    pub node: &'a Formula,
    /// The world or state the node is evaluated at
    pub world: Option<&'a World>,
    /// The assignment, restricted to the free variables of the node
    pub assignment: Assignment,
    /// Which step of the evaluation this is
    pub phase: Phase,
    /// The candidate tried, for `Pick` and `Reject`
    pub candidate: Option<Candidate<'a>>,
    /// The value of the body at the candidate, or of the node for `Verdict`
    pub verdict: Option<bool>,
    /// The number of quantifiers and modal operators enclosing the node, plus
    /// one for candidate events
    pub depth: usize,
}

/// Receives trace events from the evaluator.
pub trait TraceSink {
    /// Whether events should be built at all.
    fn enabled(&self) -> bool {
        true
    }

    /// Record one event.
    fn record(&mut self, event: TraceEvent<'_>);
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn enabled(&self) -> bool {
        (**self).enabled()
    }

    fn record(&mut self, event: TraceEvent<'_>) {
        (**self).record(event)
    }
}

/// A sink that never asks for events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn enabled(&self) -> bool {
        false
    }

    fn record(&mut self, _event: TraceEvent<'_>) {}
}

/// An owned copy of a [`TraceEvent`], for keeping after evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceRecord {
    #[allow(missing_docs)]
    pub node: String,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world: Option<World>,
    #[allow(missing_docs)]
    pub assignment: Vec<(String, Element)>,
    #[allow(missing_docs)]
    pub phase: Phase,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<String>,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<bool>,
    #[allow(missing_docs)]
    pub depth: usize,
}

impl From<TraceEvent<'_>> for TraceRecord {
    fn from(event: TraceEvent<'_>) -> Self {
        Self {
            node: event.node.to_string(),
            world: event.world.cloned(),
            assignment: event.assignment.into_iter().collect(),
            phase: event.phase,
            candidate: event.candidate.map(|c| match c {
                Candidate::Element(e) => e.clone(),
                Candidate::World(w) => w.clone(),
            }),
            verdict: event.verdict,
            depth: event.depth,
        }
    }
}

fn fmt_event(
    node: &str,
    world: Option<&World>,
    assignment: &Assignment,
    phase: Phase,
    candidate: Option<&str>,
    verdict: Option<bool>,
) -> String {
    let mut s = match phase {
        Phase::Enter => format!("enter {node}"),
        Phase::Pick => format!("pick {}", candidate.unwrap_or("?")),
        Phase::Reject => format!("reject {}", candidate.unwrap_or("?")),
        Phase::Verdict => format!("{node} is {}", verdict.unwrap_or_default()),
    };
    if let Some(w) = world {
        s.push_str(&format!(" at {w}"));
    }
    if !assignment.is_empty() {
        s.push_str(&format!(" under {}", fmt_assignment(assignment)));
    }
    s
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let assignment: Assignment = self.assignment.iter().cloned().collect();
        write!(
            f,
            "{}{}",
            "  ".repeat(self.depth),
            fmt_event(
                &self.node,
                self.world.as_ref(),
                &assignment,
                self.phase,
                self.candidate.as_deref(),
                self.verdict,
            )
        )
    }
}

/// A sink that keeps every event.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TraceLog {
    /// The events, in the order they were emitted
    pub records: Vec<TraceRecord>,
}

impl TraceLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the log as indented lines, one per event.
    pub fn render(&self) -> String {
        self.records.iter().join("\n")
    }
}

impl TraceSink for TraceLog {
    fn record(&mut self, event: TraceEvent<'_>) {
        self.records.push(event.into());
    }
}

/// A sink that writes each event as an indented line through
/// [`log::trace!`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn enabled(&self) -> bool {
        log::log_enabled!(log::Level::Trace)
    }

    fn record(&mut self, event: TraceEvent<'_>) {
        let candidate = event.candidate.map(|c| match c {
            Candidate::Element(e) => e.as_str(),
            Candidate::World(w) => w.as_str(),
        });
        log::trace!(
            "{}{}",
            "  ".repeat(event.depth),
            fmt_event(
                &event.node.to_string(),
                event.world,
                &event.assignment,
                event.phase,
                candidate,
                event.verdict,
            )
        );
    }
}

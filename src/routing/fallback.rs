//! Deferred fallback handlers collected during traversal.
//!
//! # Design Decisions
//! - Plain LIFO over a `Vec`; records hold values, never parent links
//! - Lives for exactly one top-level resolution
//! - Only the traversal engine pushes, only the resolver pops

use std::fmt;

use crate::routing::node::{Lookup, NodeRef};

/// Which convention a fallback came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    Default,
    Lookup,
}

impl FallbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackKind::Default => "default",
            FallbackKind::Lookup => "lookup",
        }
    }
}

/// A handler captured while walking past a node, with the remainder as it
/// was at that node.
pub enum Fallback<H> {
    /// Terminal catch-all. Resolves immediately when popped.
    Default { handler: H, remainder: Vec<String> },
    /// Redirect function. Invoked with the captured remainder when popped.
    Lookup {
        owner: NodeRef<H>,
        lookup: Lookup<H>,
        remainder: Vec<String>,
    },
}

impl<H> Fallback<H> {
    pub fn kind(&self) -> FallbackKind {
        match self {
            Fallback::Default { .. } => FallbackKind::Default,
            Fallback::Lookup { .. } => FallbackKind::Lookup,
        }
    }
}

impl<H: fmt::Debug> fmt::Debug for Fallback<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::Default { handler, remainder } => f
                .debug_struct("Default")
                .field("handler", handler)
                .field("remainder", remainder)
                .finish(),
            Fallback::Lookup { owner, remainder, .. } => f
                .debug_struct("Lookup")
                .field("owner", &owner.label())
                .field("remainder", remainder)
                .finish(),
        }
    }
}

/// Stack of deferred fallbacks, most recent on top.
pub struct FallbackStack<H> {
    entries: Vec<Fallback<H>>,
}

impl<H> FallbackStack<H> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn push(&mut self, fallback: Fallback<H>) {
        self.entries.push(fallback);
    }

    pub fn pop(&mut self) -> Option<Fallback<H>> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H> Default for FallbackStack<H> {
    fn default() -> Self {
        Self::new()
    }
}

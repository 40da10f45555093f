//! Capability interface for the object graph.
//!
//! The host application implements [`Node`] for whatever node type it walks.
//! Each probe returns `None` when the node exposes nothing dispatchable under
//! that name; returning `Some` is what marks an attribute as dispatchable.

use std::fmt;
use std::sync::Arc;

use crate::routing::error::{BoxError, LookupError};

/// Shared reference to a node in the host graph.
pub type NodeRef<H> = Arc<dyn Node<H>>;

/// Dynamic lookup handler. Receives the remainder captured when the node was
/// passed and may redirect traversal to another node.
///
/// `Err(LookupError::Arity { .. })` declines, `Ok(None)` also declines, any
/// other error aborts the resolution.
pub type Lookup<H> = Arc<dyn Fn(&[String]) -> Result<Option<Redirect<H>>, LookupError> + Send + Sync>;

/// Custom sub-router. Replaces segment-by-segment descent for its node.
/// `Ok(None)` means there is no next node.
pub type Router<H> = Arc<dyn Fn(&[String]) -> Result<Option<Redirect<H>>, BoxError> + Send + Sync>;

/// A node in the application object graph.
pub trait Node<H>: Send + Sync + fmt::Debug {
    /// Display name used in logs and security errors.
    fn label(&self) -> &str;

    /// Role a principal must hold to cross into this node.
    fn required_role(&self) -> Option<&str> {
        None
    }

    /// The node itself as a terminal handler.
    fn as_handler(&self) -> Option<H> {
        None
    }

    /// Attribute named by one path segment.
    fn child(&self, _segment: &str) -> Option<NodeRef<H>> {
        None
    }

    fn index(&self) -> Option<H> {
        None
    }

    /// Catch-all handler for paths that fail below this node.
    fn default_handler(&self) -> Option<H> {
        None
    }

    fn lookup(&self) -> Option<Lookup<H>> {
        None
    }

    fn router(&self) -> Option<Router<H>> {
        None
    }
}

/// New traversal state produced by a router or lookup.
pub struct Redirect<H> {
    pub node: NodeRef<H>,
    pub remainder: Vec<String>,
}

impl<H> Redirect<H> {
    pub fn new(node: NodeRef<H>, remainder: Vec<String>) -> Self {
        Self { node, remainder }
    }
}

impl<H> fmt::Debug for Redirect<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Redirect")
            .field("node", &self.node.label())
            .field("remainder", &self.remainder)
            .finish()
    }
}

/// What traversal was leaving when it crossed into a new node.
pub enum Origin<'a, H> {
    /// First step of a traversal run.
    Start,
    /// Ordinary descent from a parent node.
    Node(&'a NodeRef<H>),
    /// Jump made by the custom router of `owner`.
    Router(&'a NodeRef<H>),
    /// Jump made by the lookup handler of `owner`.
    Lookup(&'a NodeRef<H>),
}

impl<H> fmt::Display for Origin<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Start => write!(f, "<start>"),
            Origin::Node(n) => write!(f, "{}", n.label()),
            Origin::Router(n) => write!(f, "{}.route", n.label()),
            Origin::Lookup(n) => write!(f, "{}.lookup", n.label()),
        }
    }
}

//! Tree nodes and endpoints.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::routing::error::{BoxError, LookupError};
use crate::routing::node::{Lookup, Node, NodeRef, Redirect, Router};

/// Handler type served by a tree.
pub type Handler = Arc<Endpoint>;

/// A terminal handler in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Dotted position in the tree, e.g. `shop.item.index`.
    pub name: String,
    pub status: u16,
    pub body: Option<String>,
    pub requires: Option<String>,
    pub accept_noncanonical: bool,
}

/// A node of a loaded tree.
pub enum TreeNode {
    Branch(Branch),
    Leaf(Handler),
}

impl fmt::Debug for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeNode::Branch(b) => f
                .debug_struct("Branch")
                .field("label", &b.label)
                .field("children", &b.children.keys().collect::<Vec<_>>())
                .finish(),
            TreeNode::Leaf(e) => f.debug_tuple("Leaf").field(&e.name).finish(),
        }
    }
}

/// Interior node with its exposed handlers and children.
pub struct Branch {
    pub(crate) label: String,
    pub(crate) requires: Option<String>,
    pub(crate) index: Option<Handler>,
    pub(crate) default: Option<Handler>,
    pub(crate) lookup: Option<Arc<TreeLookup>>,
    pub(crate) route: Option<Arc<TreeRoute>>,
    pub(crate) children: BTreeMap<String, NodeRef<Handler>>,
}

pub(crate) struct TreeLookup {
    pub(crate) min_args: usize,
    pub(crate) max_args: Option<usize>,
    pub(crate) accept: Option<Vec<String>>,
    pub(crate) target: NodeRef<Handler>,
}

impl TreeLookup {
    fn call(&self, args: &[String]) -> Result<Option<Redirect<Handler>>, LookupError> {
        LookupError::check_arity(self.min_args, self.max_args, args.len())?;
        if let Some(accept) = &self.accept {
            match args.first() {
                Some(first) if accept.contains(first) => {}
                _ => return Ok(None),
            }
        }
        Ok(Some(Redirect::new(self.target.clone(), args[self.min_args..].to_vec())))
    }
}

pub(crate) struct TreeRoute {
    pub(crate) skip: usize,
    pub(crate) target: NodeRef<Handler>,
}

impl TreeRoute {
    fn call(&self, remainder: &[String]) -> Option<Redirect<Handler>> {
        let skip = self.skip.min(remainder.len());
        Some(Redirect::new(self.target.clone(), remainder[skip..].to_vec()))
    }
}

impl Node<Handler> for TreeNode {
    fn label(&self) -> &str {
        match self {
            TreeNode::Branch(b) => &b.label,
            TreeNode::Leaf(e) => &e.name,
        }
    }

    fn required_role(&self) -> Option<&str> {
        match self {
            TreeNode::Branch(b) => b.requires.as_deref(),
            TreeNode::Leaf(_) => None,
        }
    }

    fn as_handler(&self) -> Option<Handler> {
        match self {
            TreeNode::Leaf(e) => Some(e.clone()),
            TreeNode::Branch(_) => None,
        }
    }

    fn child(&self, segment: &str) -> Option<NodeRef<Handler>> {
        match self {
            TreeNode::Branch(b) => b.children.get(segment).cloned(),
            TreeNode::Leaf(_) => None,
        }
    }

    fn index(&self) -> Option<Handler> {
        match self {
            TreeNode::Branch(b) => b.index.clone(),
            TreeNode::Leaf(_) => None,
        }
    }

    fn default_handler(&self) -> Option<Handler> {
        match self {
            TreeNode::Branch(b) => b.default.clone(),
            TreeNode::Leaf(_) => None,
        }
    }

    fn lookup(&self) -> Option<Lookup<Handler>> {
        let TreeNode::Branch(b) = self else { return None };
        let lookup = b.lookup.clone()?;
        Some(Arc::new(move |args: &[String]| lookup.call(args)))
    }

    fn router(&self) -> Option<Router<Handler>> {
        let TreeNode::Branch(b) = self else { return None };
        let route = b.route.clone()?;
        Some(Arc::new(move |remainder: &[String]| {
            Ok::<_, BoxError>(route.call(remainder))
        }))
    }
}

//! Declarative object graph.
//!
//! # Data Flow
//! ```text
//! tree file (TOML)
//!     → schema.rs (deserialize TreeSpec)
//!     → Tree::from_spec (check, name endpoints, build TreeNode graph)
//!     → Tree (immutable, shared via Arc, swapped on reload)
//! ```
//!
//! # Design Decisions
//! - Endpoint names come from their position (`shop.item.index`)
//! - A segment names either an endpoint or a child node, never both
//! - Labels are unique across the tree; a load that would reuse one fails
//! - Role requirements stay on their node, where `RolePolicy` reads them
//!   on boundary crossings

pub mod node;
pub mod schema;

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::routing::node::NodeRef;
use crate::security::RolePolicy;

pub use node::{Endpoint, Handler, TreeNode};
pub use schema::{EndpointSpec, LookupSpec, NodeSpec, RouteSpec, TreeSpec};

use node::{Branch, TreeLookup, TreeRoute};

/// Tree served when no tree file is configured.
pub const DEMO_TREE: &str = include_str!("../../demo/shop.toml");

/// Errors raised while loading a tree.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("failed to read tree file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tree: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid node '{node}': {reason}")]
    Invalid { node: String, reason: String },
}

/// A loaded, immutable object graph.
#[derive(Debug, Clone)]
pub struct Tree {
    root: NodeRef<Handler>,
    endpoints: usize,
}

impl Tree {
    /// Build a tree from its parsed document.
    pub fn from_spec(spec: &TreeSpec) -> Result<Self, TreeError> {
        let mut builder = Builder::default();
        let root = builder.node(String::new(), &spec.root)?;
        Ok(Self {
            root,
            endpoints: builder.endpoints,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, TreeError> {
        let spec: TreeSpec = toml::from_str(content)?;
        Self::from_spec(&spec)
    }

    /// Load a tree from a TOML file.
    pub fn load(path: &Path) -> Result<Self, TreeError> {
        let content = fs::read_to_string(path).map_err(|source| TreeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// The bundled demo shop.
    pub fn demo() -> Result<Self, TreeError> {
        Self::from_toml(DEMO_TREE)
    }

    pub fn root(&self) -> &NodeRef<Handler> {
        &self.root
    }

    /// Number of endpoints reachable in the tree, exposed or not.
    pub fn endpoint_count(&self) -> usize {
        self.endpoints
    }

    /// Security policy for a principal holding `roles`.
    pub fn policy<I, S>(&self, roles: I) -> RolePolicy
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RolePolicy::new(roles)
    }
}

#[derive(Default)]
struct Builder {
    labels: HashSet<String>,
    endpoints: usize,
}

impl Builder {
    fn node(&mut self, label: String, spec: &NodeSpec) -> Result<NodeRef<Handler>, TreeError> {
        self.claim(display_label(&label))?;

        let mut children = BTreeMap::new();
        for (name, endpoint) in &spec.endpoints {
            if spec.children.contains_key(name) {
                return Err(TreeError::Invalid {
                    node: display_label(&label),
                    reason: format!("'{name}' is both an endpoint and a child"),
                });
            }
            if let Some(handler) = self.endpoint(&label, name, endpoint)? {
                children.insert(name.clone(), Arc::new(TreeNode::Leaf(handler)) as NodeRef<Handler>);
            }
        }
        for (name, child) in &spec.children {
            children.insert(name.clone(), self.node(join(&label, name), child)?);
        }

        let lookup = match &spec.lookup {
            Some(lookup) => Some(Arc::new(self.lookup(&label, lookup)?)),
            None => None,
        };
        let route = match &spec.route {
            Some(route) => Some(Arc::new(TreeRoute {
                skip: route.skip,
                target: self.node(join(&label, "route"), &route.target)?,
            })),
            None => None,
        };

        let index = match &spec.index {
            Some(endpoint) => self.endpoint(&label, "index", endpoint)?,
            None => None,
        };
        let default = match &spec.default {
            Some(endpoint) => self.endpoint(&label, "default", endpoint)?,
            None => None,
        };
        // `index` is an ordinary attribute too, reachable by name.
        if let Some(handler) = &index {
            children
                .entry("index".to_string())
                .or_insert_with(|| Arc::new(TreeNode::Leaf(handler.clone())) as NodeRef<Handler>);
        }

        let branch = Branch {
            label: display_label(&label),
            requires: spec.requires.clone(),
            index,
            default,
            lookup,
            route,
            children,
        };
        Ok(Arc::new(TreeNode::Branch(branch)))
    }

    fn lookup(&mut self, label: &str, spec: &LookupSpec) -> Result<TreeLookup, TreeError> {
        if let Some(max) = spec.max_args {
            if max < spec.min_args {
                return Err(TreeError::Invalid {
                    node: display_label(label),
                    reason: format!("lookup max_args {max} is below min_args {}", spec.min_args),
                });
            }
        }
        Ok(TreeLookup {
            min_args: spec.min_args,
            max_args: spec.max_args,
            accept: spec.accept.clone(),
            target: self.node(join(label, "lookup"), &spec.target)?,
        })
    }

    /// Counted even when hidden; only exposed endpoints become dispatchable.
    fn endpoint(&mut self, label: &str, name: &str, spec: &EndpointSpec) -> Result<Option<Handler>, TreeError> {
        let name = join(label, name);
        self.claim(name.clone())?;
        if !(100..=599).contains(&spec.status) {
            return Err(TreeError::Invalid {
                node: name,
                reason: format!("status {} is not an HTTP status", spec.status),
            });
        }
        self.endpoints += 1;
        if !spec.exposed {
            return Ok(None);
        }
        Ok(Some(Arc::new(Endpoint {
            name,
            status: spec.status,
            body: spec.body.clone(),
            requires: spec.requires.clone(),
            accept_noncanonical: spec.accept_noncanonical,
        })))
    }

    fn claim(&mut self, label: String) -> Result<(), TreeError> {
        if self.labels.contains(&label) {
            return Err(TreeError::Invalid {
                reason: "label is already used by another node".to_string(),
                node: label,
            });
        }
        self.labels.insert(label);
        Ok(())
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn display_label(label: &str) -> String {
    if label.is_empty() {
        "root".to_string()
    } else {
        label.to_string()
    }
}

//! Shared fixtures: a hand-built object graph and a recording policy.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use object_dispatch::routing::{Lookup, LookupError, Node, NodeRef, Origin, Redirect, Router, SecurityError};
use object_dispatch::security::Policy;

pub type H = &'static str;

/// Graph node with every capability optional.
#[derive(Default)]
pub struct Controller {
    label: &'static str,
    handler: Option<H>,
    index: Option<H>,
    default: Option<H>,
    lookup: Option<Lookup<H>>,
    router: Option<Router<H>>,
    children: HashMap<&'static str, NodeRef<H>>,
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller").field("label", &self.label).finish()
    }
}

impl Controller {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            ..Self::default()
        }
    }

    pub fn index(mut self, handler: H) -> Self {
        self.index = Some(handler);
        self
    }

    pub fn default_handler(mut self, handler: H) -> Self {
        self.default = Some(handler);
        self
    }

    pub fn child(mut self, name: &'static str, node: NodeRef<H>) -> Self {
        self.children.insert(name, node);
        self
    }

    pub fn lookup<F>(mut self, f: F) -> Self
    where
        F: Fn(&[String]) -> Result<Option<Redirect<H>>, LookupError> + Send + Sync + 'static,
    {
        self.lookup = Some(Arc::new(f));
        self
    }

    pub fn router<F>(mut self, f: F) -> Self
    where
        F: Fn(&[String]) -> Result<Option<Redirect<H>>, object_dispatch::routing::BoxError> + Send + Sync + 'static,
    {
        self.router = Some(Arc::new(f));
        self
    }

    pub fn build(self) -> NodeRef<H> {
        Arc::new(self)
    }
}

/// Terminal handler node.
pub fn leaf(handler: H) -> NodeRef<H> {
    Arc::new(Controller {
        label: handler,
        handler: Some(handler),
        ..Controller::default()
    })
}

impl Node<H> for Controller {
    fn label(&self) -> &str {
        self.label
    }

    fn as_handler(&self) -> Option<H> {
        self.handler
    }

    fn child(&self, segment: &str) -> Option<NodeRef<H>> {
        self.children.get(segment).cloned()
    }

    fn index(&self) -> Option<H> {
        self.index
    }

    fn default_handler(&self) -> Option<H> {
        self.default
    }

    fn lookup(&self) -> Option<Lookup<H>> {
        self.lookup.clone()
    }

    fn router(&self) -> Option<Router<H>> {
        self.router.clone()
    }
}

/// Policy recording every crossing and check; optionally denies one handler.
#[derive(Default)]
pub struct RecordingPolicy {
    pub crossings: Mutex<Vec<(String, String)>>,
    pub checks: Mutex<Vec<H>>,
    pub deny: Option<H>,
}

impl RecordingPolicy {
    pub fn denying(handler: H) -> Self {
        Self {
            deny: Some(handler),
            ..Self::default()
        }
    }

    pub fn crossings(&self) -> Vec<(String, String)> {
        self.crossings.lock().unwrap().clone()
    }

    pub fn checks(&self) -> Vec<H> {
        self.checks.lock().unwrap().clone()
    }
}

impl Policy<H> for RecordingPolicy {
    fn check(&self, handler: &H) -> Result<(), SecurityError> {
        self.checks.lock().unwrap().push(*handler);
        if self.deny == Some(*handler) {
            return Err(SecurityError::new(*handler, "denied by test"));
        }
        Ok(())
    }

    fn on_boundary_cross(&self, prev: Origin<'_, H>, next: &NodeRef<H>) -> Result<(), SecurityError> {
        self.crossings
            .lock()
            .unwrap()
            .push((prev.to_string(), next.label().to_string()));
        Ok(())
    }
}

pub fn segments(path: &[&str]) -> Vec<String> {
    path.iter().map(|s| s.to_string()).collect()
}

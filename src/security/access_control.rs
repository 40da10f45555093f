//! Role-based access control for tree graphs.
//!
//! Crossing into a node that declares `requires` needs that role, and so
//! does being served an endpoint that declares one.

use std::collections::BTreeSet;

use crate::routing::error::SecurityError;
use crate::routing::node::{NodeRef, Origin};
use crate::security::Policy;
use crate::tree::Handler;

/// Policy for one principal, built per request.
#[derive(Debug, Clone)]
pub struct RolePolicy {
    roles: BTreeSet<String>,
}

impl RolePolicy {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    fn require(&self, target: &str, role: &str) -> Result<(), SecurityError> {
        if self.roles.contains(role) {
            Ok(())
        } else {
            Err(SecurityError::new(target, format!("requires role '{role}'")))
        }
    }
}

impl Policy<Handler> for RolePolicy {
    fn check(&self, handler: &Handler) -> Result<(), SecurityError> {
        match &handler.requires {
            Some(role) => self.require(&handler.name, role),
            None => Ok(()),
        }
    }

    fn on_boundary_cross(&self, prev: Origin<'_, Handler>, next: &NodeRef<Handler>) -> Result<(), SecurityError> {
        tracing::debug!(from = %prev, to = next.label(), "controller boundary");
        match next.required_role() {
            Some(role) => self.require(next.label(), role),
            None => Ok(()),
        }
    }
}

//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Traversal:
//!     every node crossing → Policy::on_boundary_cross (may reject)
//! Resolution:
//!     final handler → Policy::check (may reject)
//!     rejection → DispatchError::Forbidden → HTTP 403
//! ```
//!
//! # Design Decisions
//! - Fail closed: a rejection aborts the resolution, it never backtracks
//! - `check` runs once, only on the handler actually returned
//! - Policies are built per request so they can carry the principal

pub mod access_control;

use crate::routing::error::SecurityError;
use crate::routing::node::{NodeRef, Origin};

pub use access_control::RolePolicy;

/// Collaborators consulted by the dispatcher.
pub trait Policy<H>: Send + Sync {
    /// Authorize the resolved handler.
    fn check(&self, _handler: &H) -> Result<(), SecurityError> {
        Ok(())
    }

    /// Called on every crossing into a non-terminal node, and on every
    /// router or lookup jump. `prev` is `Origin::Start` on the first step.
    fn on_boundary_cross(&self, _prev: Origin<'_, H>, _next: &NodeRef<H>) -> Result<(), SecurityError> {
        Ok(())
    }
}

/// Policy that permits everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl<H> Policy<H> for AllowAll {}

//! Backtracking resolver.
//!
//! # Responsibilities
//! - Run the traversal engine from the root
//! - On not-found, pop deferred fallbacks (most recent first) and retry
//! - Apply the security check to the one handler actually returned
//!
//! # Design Decisions
//! - One fallback stack per call; nothing survives between resolutions
//! - A `default` fallback is terminal, a `lookup` fallback restarts
//!   traversal and keeps growing the same stack
//! - Lookup arity errors decline; every other lookup error aborts

use crate::observability::metrics;
use crate::routing::error::DispatchError;
use crate::routing::fallback::{Fallback, FallbackStack};
use crate::routing::node::{NodeRef, Origin};
use crate::routing::path::split_path;
use crate::routing::traversal::{traverse, Resolution, Traversal};
use crate::security::Policy;

/// Resolves request paths against an object graph under a policy.
///
/// Holds no per-request state, so one dispatcher may serve many
/// concurrent resolutions.
#[derive(Debug, Clone)]
pub struct Dispatcher<P> {
    policy: P,
}

impl<P> Dispatcher<P> {
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Resolve `path` (already split into segments) starting at `root`.
    pub fn resolve<H>(&self, root: &NodeRef<H>, path: &[String]) -> Result<Resolution<H>, DispatchError<H>>
    where
        P: Policy<H>,
    {
        let mut fallbacks = FallbackStack::new();
        let mut start = root.clone();
        let mut remainder = path.to_vec();

        'traversal: loop {
            match traverse(start, remainder, &mut fallbacks, &self.policy)? {
                Traversal::Found(resolution) => return self.accept(resolution),
                Traversal::NotFound => {}
            }

            while let Some(fallback) = fallbacks.pop() {
                metrics::record_fallback(fallback.kind().as_str());
                match fallback {
                    Fallback::Default { handler, remainder } => {
                        tracing::debug!(remainder = ?remainder, "falling back to default handler");
                        return self.accept(Resolution { handler, remainder });
                    }
                    Fallback::Lookup {
                        owner,
                        lookup,
                        remainder: captured,
                    } => match lookup(&captured) {
                        Ok(Some(redirect)) => {
                            tracing::debug!(
                                lookup = owner.label(),
                                to = redirect.node.label(),
                                remainder = ?redirect.remainder,
                                "lookup redirected traversal"
                            );
                            self.policy.on_boundary_cross(Origin::Lookup(&owner), &redirect.node)?;
                            start = redirect.node;
                            remainder = redirect.remainder;
                            continue 'traversal;
                        }
                        Ok(None) => {
                            tracing::debug!(lookup = owner.label(), "lookup declined");
                        }
                        Err(e) if e.is_arity() => {
                            tracing::debug!(lookup = owner.label(), error = %e, "lookup rejected arguments");
                        }
                        Err(e) => return Err(DispatchError::Lookup(e)),
                    },
                }
            }

            return Err(DispatchError::NotFound);
        }
    }

    /// Split a raw URL path and resolve it.
    pub fn resolve_path<H>(&self, root: &NodeRef<H>, path: &str) -> Result<Resolution<H>, DispatchError<H>>
    where
        P: Policy<H>,
    {
        self.resolve(root, &split_path(path))
    }

    fn accept<H>(&self, resolution: Resolution<H>) -> Result<Resolution<H>, DispatchError<H>>
    where
        P: Policy<H>,
    {
        self.policy.check(&resolution.handler)?;
        Ok(resolution)
    }
}

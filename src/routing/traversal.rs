//! Traversal engine.
//!
//! Walks one path against the object graph, one segment per step:
//!
//! ```text
//! node absent          → NotFound
//! node is a handler    → Found(node, remainder)
//! otherwise            → boundary hook
//!   remainder = ["", ..] and index   → Found(index, remainder[1..])
//!   remainder = []       and index   → NonCanonicalPath(index)
//!   push default, then lookup onto the fallback stack
//!   router               → restart at the node it returns
//!   remainder = []       → NotFound
//!   else                 → child(remainder[0]), remainder[1..]
//! ```

use crate::routing::error::DispatchError;
use crate::routing::fallback::{Fallback, FallbackStack};
use crate::routing::node::{NodeRef, Origin, Redirect};
use crate::security::Policy;

/// A resolved handler with the segments it did not consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<H> {
    pub handler: H,
    pub remainder: Vec<String>,
}

/// Result of one traversal run. Not-found is an expected outcome the
/// resolver backtracks on, so it is a value rather than an error.
#[derive(Debug)]
pub enum Traversal<H> {
    Found(Resolution<H>),
    NotFound,
}

/// Walk from `start` until a handler is found or the path is exhausted.
///
/// Fallbacks passed on the way are pushed onto `fallbacks`. Errors are the
/// outcomes that must not be retried: non-canonical index hits, policy
/// rejections and router failures.
pub fn traverse<H>(
    start: NodeRef<H>,
    remainder: Vec<String>,
    fallbacks: &mut FallbackStack<H>,
    policy: &dyn Policy<H>,
) -> Result<Traversal<H>, DispatchError<H>> {
    let mut current = Some(start);
    let mut prev: Option<NodeRef<H>> = None;
    let mut remainder = remainder;

    loop {
        let Some(node) = current.take() else {
            return Ok(Traversal::NotFound);
        };

        if let Some(handler) = node.as_handler() {
            return Ok(Traversal::Found(Resolution { handler, remainder }));
        }

        let origin = match &prev {
            Some(p) => Origin::Node(p),
            None => Origin::Start,
        };
        tracing::trace!(from = %origin, to = node.label(), "crossing boundary");
        policy.on_boundary_cross(origin, &node)?;

        match remainder.first().map(String::is_empty) {
            Some(true) => {
                if let Some(index) = node.index() {
                    remainder.remove(0);
                    return Ok(Traversal::Found(Resolution {
                        handler: index,
                        remainder,
                    }));
                }
            }
            None => {
                if let Some(index) = node.index() {
                    return Err(DispatchError::NonCanonicalPath {
                        handler: index,
                        remainder,
                    });
                }
            }
            Some(false) => {}
        }

        if let Some(handler) = node.default_handler() {
            fallbacks.push(Fallback::Default {
                handler,
                remainder: remainder.clone(),
            });
        }
        if let Some(lookup) = node.lookup() {
            fallbacks.push(Fallback::Lookup {
                owner: node.clone(),
                lookup,
                remainder: remainder.clone(),
            });
        }

        if let Some(router) = node.router() {
            let routed = router(&remainder).map_err(DispatchError::Router)?;
            let Some(Redirect { node: next, remainder: rest }) = routed else {
                return Ok(Traversal::NotFound);
            };
            tracing::debug!(router = node.label(), to = next.label(), remainder = ?rest, "custom router redirected");
            policy.on_boundary_cross(Origin::Router(&node), &next)?;
            // Fresh run from the routed node. The router's own children
            // are never consulted for these segments.
            prev = None;
            current = Some(next);
            remainder = rest;
            continue;
        }

        if remainder.is_empty() {
            return Ok(Traversal::NotFound);
        }
        let segment = remainder.remove(0);
        current = node.child(&segment);
        prev = Some(node);
    }
}

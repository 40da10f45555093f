//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Request path "/shop/item/"
//!     → path.rs (split into ["shop", "item", ""])
//!     → resolver.rs (Dispatcher::resolve)
//!         → traversal.rs (walk the object graph, collect fallbacks)
//!         → fallback.rs (pop default/lookup handlers on not-found)
//!     → Return: Resolution { handler, remainder } or DispatchError
//! ```
//!
//! # Design Decisions
//! - The object graph is read-only during a resolution
//! - Node capabilities are a typed trait (node.rs), not name probing
//! - Not-found drives backtracking as a plain value, never as an error
//! - Non-canonical index hits are reported to the caller, not retried

pub mod error;
pub mod fallback;
pub mod node;
pub mod path;
pub mod resolver;
pub mod traversal;

pub use error::{BoxError, DispatchError, LookupError, SecurityError};
pub use fallback::{Fallback, FallbackKind, FallbackStack};
pub use node::{Lookup, Node, NodeRef, Origin, Redirect, Router};
pub use path::{canonical_location, split_path};
pub use resolver::Dispatcher;
pub use traversal::{traverse, Resolution, Traversal};

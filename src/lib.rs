//! Object-graph request dispatch.
//!
//! Resolves a request path to a handler by walking an application object
//! graph one segment at a time, with index, default, lookup and custom
//! router conventions and backtracking through deferred fallbacks.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod tree;

pub use config::DispatchConfig;
pub use http::DispatchServer;
pub use routing::{DispatchError, Dispatcher, Node, NodeRef, Resolution};
pub use tree::Tree;

//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, principal roles, path segments)
//!     → routing::Dispatcher (resolve against the current tree)
//!     → response.rs (outcome → status, redirect, body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdMaker, X_REQUEST_ID};
pub use server::{AppState, DispatchServer};

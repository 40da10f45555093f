//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init logging/metrics → Load tree → Listen
//!
//! Shutdown (shutdown.rs):
//!     SIGINT/SIGTERM → Stop accepting → Drain in-flight requests → Exit
//! ```

pub mod shutdown;

pub use shutdown::{shutdown_signal, Shutdown};

//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DispatchConfig (validated, immutable)
//!
//! tree file (TOML), when tree.watch is set:
//!     watcher.rs detects change
//!     → Tree::load
//!     → atomic swap of the served Arc<Tree>
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; only the tree hot-reloads
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{DispatchConfig, DispatchSettings, LogFormat, ObservabilityConfig, ServerConfig, TreeConfig};
pub use validation::ValidationError;

//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! dispatch service. All types derive Serde traits for deserialization
//! from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the dispatch service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DispatchConfig {
    /// Listener settings.
    pub server: ServerConfig,

    /// Resolution outcome handling.
    pub dispatch: DispatchSettings,

    /// Where the object graph comes from.
    pub tree: TreeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// How resolution outcomes become responses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Redirect index hits lacking a trailing slash instead of serving them.
    pub force_canonical: bool,

    /// Status used for canonical redirects.
    pub redirect_status: u16,

    /// Header carrying the principal's comma-separated roles.
    pub roles_header: String,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            force_canonical: true,
            redirect_status: 302,
            roles_header: "x-roles".to_string(),
        }
    }
}

/// Object graph source.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TreeConfig {
    /// Tree file (TOML). The bundled demo tree is served when unset.
    pub path: Option<String>,

    /// Reload the tree file when it changes.
    pub watch: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "object_dispatch=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

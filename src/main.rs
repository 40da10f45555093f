//! Object dispatch server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request       ┌──────────────────────────────────────────────────┐
//!     ─────────────────────┼─▶ http server ──▶ routing::Dispatcher             │
//!                          │                     │  traversal ◀─▶ fallbacks     │
//!                          │                     ▼                              │
//!                          │                 security::Policy                   │
//!                          │                     │                              │
//!     Client Response      │                     ▼                              │
//!     ◀────────────────────┼── response ◀── Resolution | DispatchError          │
//!                          │                                                    │
//!                          │  config · tree (hot reload) · observability        │
//!                          └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use object_dispatch::config::{load_config, watcher::TreeWatcher, DispatchConfig};
use object_dispatch::lifecycle::shutdown_signal;
use object_dispatch::observability::{logging, metrics};
use object_dispatch::{DispatchServer, Tree};

#[derive(Parser)]
#[command(name = "object-dispatch")]
#[command(about = "Serve an object tree over HTTP", long_about = None)]
struct Args {
    /// Configuration file (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tree file, overriding `tree.path` from the configuration.
    #[arg(short, long)]
    tree: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => DispatchConfig::default(),
    };
    if let Some(tree) = &args.tree {
        config.tree.path = Some(tree.display().to_string());
    }

    logging::init_logging(&config.observability);
    tracing::info!("object-dispatch v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.server.bind_address,
        force_canonical = config.dispatch.force_canonical,
        tree = ?config.tree.path,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let tree_path = config.tree.path.as_ref().map(PathBuf::from);
    let tree = match &tree_path {
        Some(path) => Tree::load(path)?,
        None => {
            tracing::info!("No tree configured, serving the demo tree");
            Tree::demo()?
        }
    };
    tracing::info!(endpoints = tree.endpoint_count(), "Tree loaded");

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = DispatchServer::new(config.clone(), tree);

    // Held for the lifetime of the server; dropping it stops reloads.
    let _watcher = match (&tree_path, config.tree.watch) {
        (Some(path), true) => Some(TreeWatcher::new(path, server.tree()).run()?),
        _ => None,
    };

    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

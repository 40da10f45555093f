use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use object_dispatch::config::load_config;
use object_dispatch::routing::DispatchError;
use object_dispatch::{Dispatcher, Tree};

#[derive(Parser)]
#[command(name = "dispatch-cli")]
#[command(about = "Inspect object trees and dispatch configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a path against a tree and print the outcome
    Resolve {
        /// Request path, e.g. /shop/42/
        path: String,

        /// Tree file (the demo tree when omitted)
        #[arg(short, long)]
        tree: Option<PathBuf>,

        /// Comma-separated roles held by the principal
        #[arg(short, long, value_delimiter = ',')]
        roles: Vec<String>,
    },
    /// Load a tree file and report problems
    CheckTree { file: PathBuf },
    /// Load a configuration file and report problems
    CheckConfig { file: PathBuf },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve { path, tree, roles } => {
            let tree = load_tree(tree.as_deref())?;
            let dispatcher = Dispatcher::new(tree.policy(roles));
            let outcome = match dispatcher.resolve_path(tree.root(), &path) {
                Ok(resolution) => json!({
                    "outcome": "resolved",
                    "handler": resolution.handler.name,
                    "remainder": resolution.remainder,
                }),
                Err(DispatchError::NonCanonicalPath { handler, remainder }) => json!({
                    "outcome": "non_canonical",
                    "handler": handler.name,
                    "remainder": remainder,
                }),
                Err(e) => json!({
                    "outcome": e.outcome(),
                    "error": e.to_string(),
                }),
            };
            print_json(&outcome)?;
        }
        Commands::CheckTree { file } => {
            let tree = Tree::load(&file)?;
            print_json(&json!({
                "file": file.display().to_string(),
                "endpoints": tree.endpoint_count(),
            }))?;
        }
        Commands::CheckConfig { file } => {
            let config = load_config(&file)?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn load_tree(path: Option<&Path>) -> Result<Tree, object_dispatch::tree::TreeError> {
    match path {
        Some(path) => Tree::load(path),
        None => Tree::demo(),
    }
}

fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

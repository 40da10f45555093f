//! Tree file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::tree::Tree;

/// Monitors the tree file and swaps in each version that loads cleanly.
pub struct TreeWatcher {
    path: PathBuf,
    tree: Arc<ArcSwap<Tree>>,
}

impl TreeWatcher {
    pub fn new(path: &Path, tree: Arc<ArcSwap<Tree>>) -> Self {
        Self {
            path: path.to_path_buf(),
            tree,
        }
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive for reloads to continue.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();
        let tree = self.tree.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!(path = ?path, "Tree file change detected, reloading");
                        reload(&path, &tree);
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Tree watcher started");
        Ok(watcher)
    }
}

/// Load `path` and publish it; a broken file keeps the current tree.
pub fn reload(path: &Path, tree: &ArcSwap<Tree>) -> bool {
    match Tree::load(path) {
        Ok(new_tree) => {
            tracing::info!(endpoints = new_tree.endpoint_count(), "Tree reloaded");
            tree.store(Arc::new(new_tree));
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to reload tree. Keeping current tree.");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Dispatcher;
    use crate::security::AllowAll;

    #[test]
    fn test_reload_keeps_tree_on_error() {
        let dir = std::env::temp_dir().join(format!("object-dispatch-reload-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tree.toml");

        let served = ArcSwap::from_pointee(Tree::from_toml("[root.endpoints.old]\n").unwrap());

        std::fs::write(&path, "[root.endpoints.new]\n").unwrap();
        assert!(reload(&path, &served));
        let dispatcher = Dispatcher::new(AllowAll);
        let resolved = dispatcher.resolve_path(served.load().root(), "/new").unwrap();
        assert_eq!(resolved.handler.name, "new");

        std::fs::write(&path, "[root.endpoints.new\n").unwrap();
        assert!(!reload(&path, &served));
        assert!(dispatcher.resolve_path(served.load().root(), "/new").is_ok());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

//! Services file watcher for hot reload.

use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::registry::file::FileRegistry;

/// Watch the services file and reload the registry on change.
///
/// The returned watcher must be kept alive for events to fire. A
/// reload failure keeps the current snapshot.
pub fn watch_registry(
    registry: Arc<FileRegistry>,
    path: &std::path::Path,
) -> Result<RecommendedWatcher, notify::Error> {
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if event.kind.is_modify() || event.kind.is_create() {
                    tracing::info!("Services file change detected, reloading...");
                    if let Err(e) = registry.reload() {
                        tracing::error!(
                            "Failed to reload services: {}. Keeping current registry.",
                            e
                        );
                    }
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    )?;

    watcher.watch(path, RecursiveMode::NonRecursive)?;

    tracing::info!(path = ?path, "Services watcher started");
    Ok(watcher)
}

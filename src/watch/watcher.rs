// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::RuntimeEvent;
use crate::watch::event_handler::{is_relevant, process_file_change};
use crate::watch::patterns::WatchProfile;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive; dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch `root` recursively and feed matching changes into the runtime.
///
/// One notify watcher covers the whole project; every profile (source
/// categories and the output tree) is matched against each changed path.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    profiles: Vec<WatchProfile>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or(root);

    let profiles = Arc::new(profiles);

    // notify calls back on its own thread; hop into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    eprintln!("assetflow: failed to forward notify event: {err}");
                }
            }
            Err(err) => eprintln!("assetflow: file watch error: {err}"),
        },
        Config::default(),
    )?;

    watcher
        .watch(&root, RecursiveMode::Recursive)
        .with_context(|| format!("watching {:?}", root))?;

    for profile in profiles.iter() {
        debug!(target_task = %profile.target(), patterns = ?profile.patterns(), "watching");
    }
    info!("file watcher started on {:?}", root);

    let loop_root = root.clone();
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if !is_relevant(&event.kind) {
                continue;
            }
            debug!(?event, "received notify event");

            for path in &event.paths {
                let open =
                    process_file_change(&loop_root, path, &event.kind, &profiles, &runtime_tx)
                        .await;
                if !open {
                    debug!("runtime gone; stopping watcher loop");
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

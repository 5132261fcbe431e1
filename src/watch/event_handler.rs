// src/watch/event_handler.rs

//! Turns a single changed path into runtime events.

use std::path::Path;

use notify::EventKind;
use notify::event::ModifyKind;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::{RuntimeEvent, TriggerReason};
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::{WatchProfile, WatchTarget};

/// Whether an event can change what a watcher cares about. Access events
/// (reads, opens) are noise.
pub fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Any
    )
}

/// Map a changed path onto runtime events: one `TaskTriggered` per matching
/// task profile, and an `OutputChanged` if the output tree matched.
///
/// Removals in the output tree never reload; `clean` would otherwise storm
/// every connected browser. Metadata-only changes (the mtime stamp after a
/// copy) don't reload either, so one written file is one reload.
pub fn events_for_path(
    root: &Path,
    path: &Path,
    kind: &EventKind,
    profiles: &[WatchProfile],
) -> Vec<RuntimeEvent> {
    let Some(rel) = relative_str(root, path) else {
        warn!(?path, ?root, "could not relativize path against root");
        return Vec::new();
    };

    let mut events = Vec::new();
    for profile in profiles.iter().filter(|p| p.matches(&rel)) {
        match profile.target() {
            WatchTarget::Task(task) => {
                debug!(task = %task, path = %rel, "watch match -> triggering task");
                events.push(RuntimeEvent::TaskTriggered {
                    task: task.name().to_string(),
                    reason: TriggerReason::FileWatch,
                });
            }
            WatchTarget::Reload => {
                if matches!(
                    kind,
                    EventKind::Remove(_) | EventKind::Modify(ModifyKind::Metadata(_))
                ) {
                    continue;
                }
                events.push(RuntimeEvent::OutputChanged { path: rel.clone() });
            }
        }
    }
    events
}

/// Process one changed path and forward the resulting events.
///
/// Returns `false` once the runtime channel is closed.
pub async fn process_file_change(
    root: &Path,
    path: &Path,
    kind: &EventKind,
    profiles: &[WatchProfile],
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
) -> bool {
    for event in events_for_path(root, path, kind, profiles) {
        if let Err(err) = runtime_tx.send(event).await {
            warn!("failed to forward watch event to runtime: {err}");
            return false;
        }
    }
    true
}

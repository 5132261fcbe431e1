// src/watch/mod.rs

//! File watching for `serve`.
//!
//! This module is responsible for:
//! - Compiling the watch map (source globs per task, output tree for reloads).
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//!
//! It does **not** know about plans; it only turns filesystem changes into
//! task triggers and reload notifications.

pub mod event_handler;
pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use event_handler::events_for_path;
pub use patterns::{WatchProfile, WatchTarget, build_watch_profiles, watched_tasks};
pub use watcher::{WatcherHandle, spawn_watcher};

// src/server/mod.rs

//! Development HTTP server.
//!
//! Serves the output tree, injects a live-reload client into HTML pages and
//! pushes a server-sent event to every connected page whenever the engine
//! reports that an output file changed.

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerSection;

mod live_reload;
mod static_files;

pub use live_reload::{LIVERELOAD_PATH, client_script, inject_client};
pub use static_files::sanitize_path;

/// An output file changed; connected pages should reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadEvent {
    /// Path relative to the project root.
    pub path: String,
}

/// Channel used by the engine to reach connected browsers.
pub fn reload_channel() -> (
    broadcast::Sender<ReloadEvent>,
    broadcast::Receiver<ReloadEvent>,
) {
    broadcast::channel(64)
}

#[derive(Debug, Clone)]
pub(crate) struct ServerState {
    pub(crate) root: Arc<PathBuf>,
    pub(crate) reload_tx: broadcast::Sender<ReloadEvent>,
    pub(crate) notify: bool,
}

#[derive(Debug, Clone)]
pub struct LiveServer {
    host: String,
    port: u16,
    state: ServerState,
}

impl LiveServer {
    pub fn new(
        cfg: &ServerSection,
        root: PathBuf,
        reload_tx: broadcast::Sender<ReloadEvent>,
    ) -> Self {
        Self {
            host: cfg.host.clone(),
            port: cfg.port,
            state: ServerState {
                root: Arc::new(root),
                reload_tx,
                notify: cfg.notify,
            },
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(LIVERELOAD_PATH, get(live_reload::events))
            .fallback(static_files::serve)
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("binding {}:{}", self.host, self.port))?;
        let addr: SocketAddr = listener.local_addr()?;
        info!(root = ?self.state.root, %addr, "serving at http://{addr}/");
        println!(
            "assetflow: serving {} at http://{addr}/",
            self.state.root.display()
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .context("http server error")?;
        info!("server stopped");
        Ok(())
    }
}

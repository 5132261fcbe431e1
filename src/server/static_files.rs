// src/server/static_files.rs

use std::path::{Path, PathBuf};

use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tracing::{debug, warn};

use super::ServerState;
use super::live_reload::inject_client;

/// Serve a file from the output root. HTML pages get the live-reload client;
/// everything else goes through `ServeDir`.
pub(super) async fn serve(State(state): State<ServerState>, req: Request) -> Response {
    let Some(rel) = sanitize_path(req.uri().path()) else {
        warn!(
            path = req.uri().path(),
            "rejected path outside the output root"
        );
        return StatusCode::NOT_FOUND.into_response();
    };

    let mut file = state.root.join(&rel);
    if tokio::fs::metadata(&file).await.is_ok_and(|m| m.is_dir()) {
        file = file.join("index.html");
    }

    if is_html(&file) {
        return match tokio::fs::read_to_string(&file).await {
            Ok(html) => {
                debug!(path = ?file, "serving page with live-reload client");
                (
                    [
                        (header::CONTENT_TYPE, "text/html; charset=utf-8"),
                        (header::CACHE_CONTROL, "no-cache"),
                    ],
                    inject_client(&html, state.notify),
                )
                    .into_response()
            }
            Err(_) => StatusCode::NOT_FOUND.into_response(),
        };
    }

    let service = ServeDir::new(state.root.as_ref());
    match service.oneshot(req).await {
        Ok(res) => res.into_response(),
        Err(never) => match never {},
    }
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
}

/// Turn a request path into a relative file path, or `None` when it would
/// leave the served root.
pub fn sanitize_path(path: &str) -> Option<PathBuf> {
    let decoded = percent_decode(path)?;
    let mut rel = PathBuf::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains('\\') || s.contains('\0') || s.contains(':') => return None,
            s => rel.push(s),
        }
    }
    Some(rel)
}

fn percent_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = s.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

// src/server/live_reload.rs

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use super::ServerState;

pub const LIVERELOAD_PATH: &str = "/__assetflow/livereload";

/// Server-sent event stream: one `reload` event per changed output file.
pub(super) async fn events(
    State(state): State<ServerState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("live-reload client connected");
    let rx = state.reload_tx.subscribe();
    let stream = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(ev) => {
                    let event = Event::default().event("reload").data(ev.path);
                    return Some((Ok(event), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "live-reload client lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub fn client_script(notify: bool) -> String {
    let before = if notify {
        "var d=document.createElement('div');\
         d.textContent='Reloading\\u2026';\
         d.style.cssText='position:fixed;top:8px;right:8px;z-index:2147483647;padding:6px 10px;\
         font:13px sans-serif;color:#fff;background:#1f2937;border-radius:4px';\
         document.body.appendChild(d);setTimeout(function(){location.reload()},200);"
    } else {
        "location.reload();"
    };
    format!(
        "<script>(function(){{var s=new EventSource('{LIVERELOAD_PATH}');\
         s.addEventListener('reload',function(){{{before}}});}})();</script>"
    )
}

/// Insert the client before the last `</body>`, or append it.
pub fn inject_client(html: &str, notify: bool) -> String {
    let script = client_script(notify);
    let lower = html.to_ascii_lowercase();
    match lower.rfind("</body>") {
        Some(at) => {
            let mut out = String::with_capacity(html.len() + script.len());
            out.push_str(&html[..at]);
            out.push_str(&script);
            out.push_str(&html[at..]);
            out
        }
        None => format!("{html}{script}"),
    }
}

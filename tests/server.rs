// tests/server.rs

use std::path::PathBuf;

use assetflow::config::ServerSection;
use assetflow::server::{
    LIVERELOAD_PATH, LiveServer, inject_client, reload_channel, sanitize_path,
};
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

#[test]
fn sanitize_path_keeps_requests_inside_the_root() {
    assert_eq!(sanitize_path("/"), Some(PathBuf::new()));
    assert_eq!(
        sanitize_path("/css/app.min.css"),
        Some(PathBuf::from("css/app.min.css"))
    );
    assert_eq!(sanitize_path("/./a//b"), Some(PathBuf::from("a/b")));
    assert_eq!(
        sanitize_path("/my%20page.html"),
        Some(PathBuf::from("my page.html"))
    );

    assert_eq!(sanitize_path("/../etc/passwd"), None);
    assert_eq!(sanitize_path("/a/%2e%2e/b"), None);
    assert_eq!(sanitize_path("/a%5Cb"), None);
    assert_eq!(sanitize_path("/a%00b"), None);
    assert_eq!(sanitize_path("/c:/windows"), None);
    assert_eq!(sanitize_path("/bad%zz"), None);
}

#[test]
fn client_goes_before_the_last_body_tag() {
    let html = "<html><body><p>x</p></BODY></html>";
    let out = inject_client(html, false);
    let script_at = out.find("<script>").unwrap();
    assert!(script_at < out.find("</BODY>").unwrap());
    assert!(out.starts_with("<html><body><p>x</p><script>"));
    assert!(out.contains(LIVERELOAD_PATH));
    assert!(out.contains("location.reload();"));
    assert!(!out.contains("Reloading"));

    let fragment = inject_client("<p>no body</p>", true);
    assert!(fragment.starts_with("<p>no body</p><script>"));
    assert!(fragment.contains("Reloading"));
}

fn site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("css")).unwrap();
    std::fs::create_dir_all(dir.path().join("docs")).unwrap();
    std::fs::write(
        dir.path().join("index.html"),
        "<html><body>home</body></html>",
    )
    .unwrap();
    std::fs::write(dir.path().join("docs/index.html"), "<body>docs</body>").unwrap();
    std::fs::write(dir.path().join("css/app.min.css"), ".a{color:red}").unwrap();
    dir
}

async fn get(dir: &tempfile::TempDir, uri: &str) -> (StatusCode, Option<String>, String) {
    let (reload_tx, _) = reload_channel();
    let server = LiveServer::new(
        &ServerSection::default(),
        dir.path().to_path_buf(),
        reload_tx,
    );
    let res = server
        .router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (
        status,
        content_type,
        String::from_utf8_lossy(&body).into_owned(),
    )
}

#[tokio::test]
async fn pages_are_served_with_the_reload_client() {
    let dir = site();

    let (status, ct, body) = get(&dir, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ct.as_deref(), Some("text/html; charset=utf-8"));
    assert!(body.starts_with("<html><body>home<script>"), "{body}");

    let (status, _, body) = get(&dir, "/docs/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("docs<script>"));
}

#[tokio::test]
async fn assets_are_served_verbatim() {
    let dir = site();
    let (status, ct, body) = get(&dir, "/css/app.min.css").await;
    assert_eq!(status, StatusCode::OK);
    assert!(ct.unwrap_or_default().starts_with("text/css"));
    assert_eq!(body, ".a{color:red}");
}

#[tokio::test]
async fn missing_and_escaping_paths_are_not_found() {
    let dir = site();
    assert_eq!(get(&dir, "/nope.html").await.0, StatusCode::NOT_FOUND);
    assert_eq!(get(&dir, "/nope.css").await.0, StatusCode::NOT_FOUND);
    assert_eq!(
        get(&dir, "/%2e%2e/secret.txt").await.0,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn reload_endpoint_is_an_event_stream() {
    let dir = site();
    let (reload_tx, _) = reload_channel();
    let server = LiveServer::new(
        &ServerSection::default(),
        dir.path().to_path_buf(),
        reload_tx,
    );
    let res = server
        .router()
        .oneshot(
            Request::builder()
                .uri(LIVERELOAD_PATH)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("text/event-stream")
    );
}

use super::*;
use crate::Config;
use crate::config::ProgressMode;
use crate::extractor::UnavailableExtractor;
use crate::test_helpers::ScriptedExtractor;
use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use std::time::Duration;
use tempfile::tempdir;
use tower::ServiceExt;


/// Config writing into a fresh temporary directory
fn test_config(progress_mode: ProgressMode) -> (Config, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let mut config = Config::default();
    config.download.download_dir = temp_dir.path().join("downloads");
    config.download.progress_mode = progress_mode;
    (config, temp_dir)
}

/// POST `body` as JSON to `uri`
fn json_request(uri: &str, body: &str) -> Request {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

#[tokio::test]
async fn test_api_server_serves_and_shuts_down() {
    let (config, _temp_dir) = test_config(ProgressMode::Final);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(serve(
        listener,
        Arc::new(ScriptedExtractor::succeeding()),
        Arc::new(config),
        async move {
            let _ = stop_rx.await;
        },
    ));

    tokio::time::sleep(Duration::from_millis(50)).await;
    stop_tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server should stop after the shutdown signal")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_api_server_reports_bind_failure() {
    let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (mut config, _temp_dir) = test_config(ProgressMode::Final);
    config.server.api.bind_address = taken.local_addr().unwrap();

    let result = start_api_server(
        Arc::new(UnavailableExtractor),
        Arc::new(config),
        std::future::ready(()),
    )
    .await;

    assert!(matches!(result, Err(crate::Error::Io(_))));
}

#[tokio::test]
async fn test_cors_enabled() {
    let (config, _temp_dir) = test_config(ProgressMode::Final);
    let app = create_router(Arc::new(ScriptedExtractor::succeeding()), Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*",
        "any origin should be allowed by default"
    );
}

#[tokio::test]
async fn test_cors_preflight_for_post_endpoints() {
    let (config, _temp_dir) = test_config(ProgressMode::Final);
    let app = create_router(Arc::new(ScriptedExtractor::succeeding()), Arc::new(config));

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/download")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-methods")
    );
}

#[tokio::test]
async fn test_cors_specific_origin() {
    let (mut config, _temp_dir) = test_config(ProgressMode::Final);
    config.server.api.cors_origins = vec!["http://app.example.com".to_string()];
    let app = create_router(Arc::new(ScriptedExtractor::succeeding()), Arc::new(config));

    let allowed = Request::builder()
        .uri("/health")
        .header("Origin", "http://app.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(allowed).await.unwrap();
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://app.example.com"
    );

    let other = Request::builder()
        .uri("/health")
        .header("Origin", "http://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(other).await.unwrap();
    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let (mut config, _temp_dir) = test_config(ProgressMode::Final);
    config.server.api.cors_enabled = false;
    let app = create_router(Arc::new(ScriptedExtractor::succeeding()), Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be absent when CORS is disabled"
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (config, _temp_dir) = test_config(ProgressMode::Final);
    let app = create_router(Arc::new(ScriptedExtractor::succeeding()), Arc::new(config));

    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

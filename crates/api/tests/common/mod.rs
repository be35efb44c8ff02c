#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use refactorer_db::store::{MemoryStore, RefactoringStore};
use refactorer_intelligence::{CodeIntelligence, MockBackend};
use tower::ServiceExt;

use refactorer_api::config::{BackendConfig, LogFormat, ServerConfig};
use refactorer_api::router::build_app_router;
use refactorer_api::state::AppState;

/// Sample submission used across the HTTP tests.
pub const SAMPLE_CODE: &str =
    "def inefficient_sum(numbers):\n    s = 0\n    for n in numbers:\n        s += n\n    return s";

/// Build a test `ServerConfig` with safe defaults and an instant mock backend.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        database_url: None,
        lifecycle_workers: 4,
        log_format: LogFormat::Text,
        backend: BackendConfig::Mock {
            latency: Duration::ZERO,
        },
    }
}

/// Build the full application router over an in-memory store and the
/// given backend.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_app_with(backend: Arc<dyn CodeIntelligence>) -> Router {
    let store: Arc<dyn RefactoringStore> = Arc::new(MemoryStore::new());
    let state = AppState::new(store, backend, test_config());
    build_app_router(state)
}

/// Router backed by a zero-latency [`MockBackend`].
pub fn build_test_app() -> Router {
    build_app_with(Arc::new(MockBackend::new().with_latency(Duration::ZERO)))
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Poll `GET /api/v1/refactoring/{id}` until the record leaves `processing`.
pub async fn wait_for_terminal(app: &Router, id: &str) -> serde_json::Value {
    for _ in 0..200 {
        let response = get(app.clone(), &format!("/api/v1/refactoring/{id}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        if json["data"]["status"] != "processing" {
            return json["data"].clone();
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("refactoring {id} did not reach a terminal status");
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use travelmate_api::state::{AppState, AuthConfig};
use travelmate_store::MemoryUserStore;

/// Build an `AppState` backed by a fresh in-memory user store. The store
/// handle is shared with the caller so tests can seed users directly.
pub fn test_state() -> (AppState, Arc<MemoryUserStore>) {
    let users = Arc::new(MemoryUserStore::new());
    let state = AppState {
        users: users.clone(),
        auth: AuthConfig {
            secret: "test-secret".to_string(),
            expiration: 172_800,
        },
        client_origin: "http://localhost:3000".to_string(),
    };
    (state, users)
}

/// Full application router with the same middleware stack production uses.
pub fn build_test_app(state: AppState) -> Router {
    travelmate_api::app(state)
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, path: &str) -> Response {
    send(
        app,
        Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn get_auth(app: Router, path: &str, token: &str) -> Response {
    send(
        app,
        Request::builder()
            .method("GET")
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn put_json_auth(
    app: Router,
    path: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(
        app,
        Request::builder()
            .method("PUT")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn delete_auth(app: Router, path: &str, token: &str) -> Response {
    send(
        app,
        Request::builder()
            .method("DELETE")
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use careerpath_backend::{
    app::build_app,
    config::{AppConfig, JwtConfig, StoreConfig},
    state::AppState,
};
use tower::ServiceExt;

/// Builds the real router on top of a flat-file store in a fresh tempdir.
/// The tempdir guard must stay alive for the duration of the test.
pub async fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("create tempdir");
    let config = Arc::new(AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        store: StoreConfig::File {
            path: dir.path().join("db.json"),
        },
        jwt: JwtConfig {
            secret: "test-signing-secret".into(),
            ttl_hours: 1,
        },
    });
    let state = AppState::with_config(config).await.expect("init state");
    (build_app(state), dir)
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    };

    let res = app.clone().oneshot(req).await.expect("send request");
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), 1 << 20)
        .await
        .expect("read body");
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

/// Signs up a fresh user and returns (user id, token).
pub async fn signup(app: &Router, name: &str, email: &str, password: &str) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/signup",
        None,
        Some(serde_json::json!({ "name": name, "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    (
        body["user"]["_id"].as_str().expect("user id").to_string(),
        body["token"].as_str().expect("token").to_string(),
    )
}

mod common;

use axum::http::StatusCode;
use common::{send, signup, test_app};
use serde_json::json;

#[tokio::test]
async fn signup_returns_token_and_sanitized_user() {
    let (app, _dir) = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "name": "Ana", "email": "ana@x.com", "password": "secret123" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["user"].get("password").is_none());
    assert_eq!(body["user"]["email"], "ana@x.com");
    assert_eq!(body["user"]["name"], "Ana");
    assert_eq!(body["user"]["role"], "user");
    assert!(!body["token"].as_str().unwrap().is_empty());

    // The same credentials can independently obtain a token via login.
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ana@x.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["user"].get("password").is_none());
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn login_failures_are_undifferentiated() {
    let (app, _dir) = test_app().await;
    signup(&app, "Ana", "ana@x.com", "secret123").await;

    let (wrong_pw_status, wrong_pw_body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ana@x.com", "password": "wrong" })),
    )
    .await;
    let (no_user_status, no_user_body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "nobody@x.com", "password": "secret123" })),
    )
    .await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(no_user_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw_body["error"], "Invalid email or password");
    // No leakage: identical body whether the email or the password was wrong.
    assert_eq!(wrong_pw_body, no_user_body);
}

#[tokio::test]
async fn duplicate_signup_is_rejected() {
    let (app, _dir) = test_app().await;
    signup(&app, "Ana", "ana@x.com", "secret123").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "name": "Ana Again", "email": "ana@x.com", "password": "secret456" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn signup_validates_payload() {
    let (app, _dir) = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "name": "Ana", "email": "not-an-email", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid email");

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "name": "Ana", "email": "ana@x.com", "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "email": "ana@x.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_route_requires_valid_token() {
    let (app, _dir) = test_app().await;

    let payload = json!({ "name": "Bo", "email": "bo@x.com", "password": "secret123" });

    let (status, body) = send(&app, "POST", "/api/users", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("Authorization"));

    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        Some("garbage.token.here"),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A real token opens the route.
    let (_, token) = signup(&app, "Ana", "ana@x.com", "secret123").await;
    let (status, _) = send(&app, "POST", "/api/users", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
}

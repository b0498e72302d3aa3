//! Auth gate behaviour seen through the full router

use axum::http::{header, Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use chrono::{Duration, Utc};
use tower::ServiceExt;

use tasket::backend::server::Settings;
use tasket::backend::TokenType;

use crate::common::{access_token, seed_user, TestApp};

#[tokio::test]
async fn test_public_routes_need_no_header() {
    let app = TestApp::new();

    let root = app.get("/", None).await;
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(root.body["message"], "Welcome to Tasket API");

    let health = app.get("/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body, json!({"status": "healthy"}));
}

#[tokio::test]
async fn test_gated_route_without_header_is_challenged() {
    let app = TestApp::new();

    let response = app.get("/api/v1/auth/me", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers.get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
    assert_eq!(
        response.body,
        json!({"detail": "Could not validate credentials", "status": 401})
    );
}

#[tokio::test]
async fn test_every_bad_credential_looks_the_same() {
    let app = TestApp::new();
    let user = seed_user(&app.store, "alice");
    let refresh = app.state.tokens.issue_refresh_token(user.id).unwrap();
    let ghost = app
        .state
        .tokens
        .issue_access_token(tasket::shared::UserId(9999))
        .unwrap();

    let mut bodies = Vec::new();
    for token in [refresh.as_str(), ghost.as_str(), "not-a-jwt"] {
        let response = app.get("/api/v1/auth/me", Some(token)).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        bodies.push(response.body);
    }
    assert!(bodies.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn test_me_with_access_token() {
    let app = TestApp::new();
    let user = seed_user(&app.store, "alice");
    let token = access_token(&app.state, &user);

    let response = app.get("/api/v1/auth/me", Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "alice");
    assert!(response.body.get("hashed_password").is_none());
}

#[tokio::test]
async fn test_inactive_user_is_forbidden() {
    let app = TestApp::new();
    let user = seed_user(&app.store, "alice");
    let token = access_token(&app.state, &user);
    app.store.set_active(user.id, false);

    let response = app.get("/api/v1/auth/me", Some(&token)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_paths_are_gated() {
    let app = TestApp::new();
    let user = seed_user(&app.store, "alice");
    let token = access_token(&app.state, &user);

    assert_eq!(
        app.get("/api/v1/nothing-here", None).await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.get("/api/v1/nothing-here", Some(&token)).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_lookalike_prefix_is_not_exempt() {
    let app = TestApp::new();
    assert_eq!(app.get("/healthz", None).await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_preflight_bypasses_gate() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/notifications")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn test_websocket_for_another_user_is_not_found() {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice");
    let bob = seed_user(&app.store, "bob");
    let token = access_token(&app.state, &alice);

    let response = app
        .get(&format!("/api/v1/ws/{}", bob.id), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let unauthenticated = app.get(&format!("/api/v1/ws/{}", alice.id), None).await;
    assert_eq!(unauthenticated.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_websocket_without_upgrade_headers_is_rejected() {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice");
    let token = access_token(&app.state, &alice);

    let response = app
        .get(&format!("/api/v1/ws/{}", alice.id), Some(&token))
        .await;

    assert!(response.status.is_client_error());
    assert_ne!(response.status, StatusCode::NOT_FOUND);
    assert_ne!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wildcard_allowed_hosts_mirrors_origin() {
    let app = TestApp::with_settings(Settings::from_lookup(|key| {
        (key == "ALLOWED_HOSTS").then(|| "*".to_string())
    }));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/notifications")
        .header(header::ORIGIN, "https://anywhere.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "https://anywhere.example"
    );
}

#[tokio::test]
async fn test_nine_day_old_token_is_rejected() {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice");
    let stale = app
        .state
        .tokens
        .issue_at(alice.id, TokenType::Access, Utc::now() - Duration::days(9))
        .unwrap();

    let response = app.get("/api/v1/auth/me", Some(&stale)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
}

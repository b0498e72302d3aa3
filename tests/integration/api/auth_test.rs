//! Authentication API integration tests
//!
//! Register, login, refresh and the OAuth federation flow end to end.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;

use crate::common::{seed_user, TestApp, TEST_PASSWORD};

#[tokio::test]
async fn test_register_then_login_then_me() {
    let app = TestApp::new();

    let registered = app
        .post(
            "/api/v1/auth/register",
            json!({
                "email": "new@example.com",
                "username": "newbie",
                "password": "longenough"
            }),
        )
        .await;
    assert_eq!(registered.status, StatusCode::CREATED);
    assert_eq!(registered.body["username"], "newbie");

    let login = app
        .post(
            "/api/v1/auth/login",
            json!({"email": "new@example.com", "password": "longenough"}),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["token_type"], "bearer");

    let token = login.body["access_token"].as_str().unwrap();
    let me = app.get("/api/v1/auth/me", Some(token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["email"], "new@example.com");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new();
    seed_user(&app.store, "alice");

    let response = app
        .post(
            "/api/v1/auth/register",
            json!({
                "email": "alice@example.com",
                "username": "another",
                "password": "longenough"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["detail"], "Email already registered");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    seed_user(&app.store, "alice");

    let response = app
        .post(
            "/api/v1/auth/login",
            json!({"email": "alice@example.com", "password": "wrong-password"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_issues_usable_access_token() {
    let app = TestApp::new();
    seed_user(&app.store, "alice");

    let login = app
        .post(
            "/api/v1/auth/login",
            json!({"email": "alice@example.com", "password": TEST_PASSWORD}),
        )
        .await;
    let refresh_token = login.body["refresh_token"].as_str().unwrap().to_string();
    let access_token = login.body["access_token"].as_str().unwrap().to_string();

    let refreshed = app
        .post("/api/v1/auth/refresh", json!({"refresh_token": refresh_token}))
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    assert!(refreshed.body.get("refresh_token").is_none());

    let token = refreshed.body["access_token"].as_str().unwrap();
    assert_eq!(
        app.get("/api/v1/auth/me", Some(token)).await.status,
        StatusCode::OK
    );

    // An access token is not a refresh token
    let wrong = app
        .post("/api/v1/auth/refresh", json!({"refresh_token": access_token}))
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_oauth_federation_and_exchange() {
    let app = TestApp::new();

    let created = app
        .post_signed(
            "/api/v1/auth/oauth/user",
            json!({
                "provider": "github",
                "provider_id": "gh-42",
                "email": "octo@example.com",
                "name": "Octo Cat"
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["username"], "octo");
    assert_eq!(created.body["is_verified"], true);

    let exchanged = app
        .post_signed(
            "/api/v1/auth/exchange-token",
            json!({"provider": "github", "provider_id": "gh-42"}),
        )
        .await;
    assert_eq!(exchanged.status, StatusCode::OK);

    let token = exchanged.body["access_token"].as_str().unwrap();
    let me = app.get("/api/v1/auth/me", Some(token)).await;
    assert_eq!(me.body["email"], "octo@example.com");
}

#[tokio::test]
async fn test_oauth_links_existing_email() {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice");

    let linked = app
        .post_signed(
            "/api/v1/auth/oauth/user",
            json!({
                "provider": "google",
                "provider_id": "g-1",
                "email": "alice@example.com"
            }),
        )
        .await;

    assert_eq!(linked.status, StatusCode::OK);
    assert_eq!(linked.body["id"], alice.id.0);
}

#[tokio::test]
async fn test_oauth_missing_email() {
    let app = TestApp::new();

    let response = app
        .post_signed(
            "/api/v1/auth/oauth/user",
            json!({"provider": "github", "provider_id": "gh-1"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["detail"], "Missing required OAuth data");
}

#[tokio::test]
async fn test_exchange_unlinked_identity() {
    let app = TestApp::new();

    let response = app
        .post_signed(
            "/api/v1/auth/exchange-token",
            json!({"provider": "github", "provider_id": "nobody"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_oauth_endpoints_require_exchange_secret() {
    let app = TestApp::new();
    let victim = seed_user(&app.store, "victim");

    let claimed = app
        .post(
            "/api/v1/auth/oauth/user",
            json!({
                "provider": "github",
                "provider_id": "attacker-1",
                "email": victim.email
            }),
        )
        .await;
    assert_eq!(claimed.status, StatusCode::UNAUTHORIZED);
    assert_eq!(claimed.body["status"], 401);

    let exchanged = app
        .post(
            "/api/v1/auth/exchange-token",
            json!({"provider": "github", "provider_id": "attacker-1"}),
        )
        .await;
    assert_eq!(exchanged.status, StatusCode::UNAUTHORIZED);
    assert!(exchanged.body.get("access_token").is_none());

    // A correctly signed exchange still finds nothing linked
    let after = app
        .post_signed(
            "/api/v1/auth/exchange-token",
            json!({"provider": "github", "provider_id": "attacker-1"}),
        )
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);

    let linked = app
        .state
        .users
        .find_oauth_account("github", "attacker-1")
        .await
        .unwrap();
    assert!(linked.is_none());
}

#[tokio::test]
async fn test_unparsable_body_is_json_error() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["status"], 400);
    assert!(response.body["detail"].is_string());

    let missing_field = app
        .post("/api/v1/auth/login", json!({"email": "a@example.com"}))
        .await;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_field.body["status"], 400);
}

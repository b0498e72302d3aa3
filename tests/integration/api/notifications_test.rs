//! Notification API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{access_token, seed_user, TestApp};

#[tokio::test]
async fn test_list_and_counts() {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice");
    let token = access_token(&app.state, &alice);
    for i in 0..3 {
        app.state
            .notifications
            .create(alice.id, format!("n{}", i), "body", None, None)
            .await
            .unwrap();
    }

    let page = app
        .get("/api/v1/notifications?limit=2", Some(&token))
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body["notifications"].as_array().unwrap().len(), 2);
    assert_eq!(page.body["notifications"][0]["title"], "n2");
    assert_eq!(page.body["total"], 3);
    assert_eq!(page.body["unread_count"], 3);

    let count = app
        .get("/api/v1/notifications/unread-count", Some(&token))
        .await;
    assert_eq!(count.body["unread_count"], 3);
}

#[tokio::test]
async fn test_mark_read_and_unread_filter() {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice");
    let token = access_token(&app.state, &alice);
    let first = app
        .state
        .notifications
        .create(alice.id, "first", "body", None, None)
        .await
        .unwrap();
    app.state
        .notifications
        .create(alice.id, "second", "body", None, None)
        .await
        .unwrap();

    let marked = app
        .patch(&format!("/api/v1/notifications/{}/read", first.id), Some(&token))
        .await;
    assert_eq!(marked.status, StatusCode::OK);

    let unread = app
        .get("/api/v1/notifications?unread_only=true", Some(&token))
        .await;
    let titles: Vec<&str> = unread.body["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["second"]);
}

#[tokio::test]
async fn test_cannot_mark_someone_elses_notification() {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice");
    let bob = seed_user(&app.store, "bob");
    let notification = app
        .state
        .notifications
        .create(alice.id, "private", "body", None, None)
        .await
        .unwrap();

    let response = app
        .patch(
            &format!("/api/v1/notifications/{}/read", notification.id),
            Some(&access_token(&app.state, &bob)),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.state.notifications.unread_count(alice.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_mark_all_read() {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice");
    let token = access_token(&app.state, &alice);
    for _ in 0..2 {
        app.state
            .notifications
            .create(alice.id, "t", "m", None, None)
            .await
            .unwrap();
    }

    let response = app
        .patch("/api/v1/notifications/mark-all-read", Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 2);
    assert_eq!(
        app.get("/api/v1/notifications/unread-count", Some(&token))
            .await
            .body["unread_count"],
        0
    );
}

#[tokio::test]
async fn test_notifications_require_auth() {
    let app = TestApp::new();
    let response = app.get("/api/v1/notifications", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_undecodable_path_and_query_are_json_errors() {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice");
    let token = access_token(&app.state, &alice);

    let bad_id = app
        .patch("/api/v1/notifications/not-a-number/read", Some(&token))
        .await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_id.body["status"], 400);
    assert!(bad_id.body["detail"].is_string());

    let bad_limit = app
        .get("/api/v1/notifications?limit=lots", Some(&token))
        .await;
    assert_eq!(bad_limit.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_limit.body["status"], 400);
}

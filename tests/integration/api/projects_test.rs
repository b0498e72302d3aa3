//! Project membership endpoint

use axum::http::StatusCode;
use tasket::backend::ProjectRole;
use tasket::shared::ProjectId;

use crate::common::{access_token, seed_user, TestApp};

#[tokio::test]
async fn test_member_sees_role() {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice");
    app.store
        .add_membership(ProjectId(7), alice.id, ProjectRole::Admin, true);

    let response = app
        .get(
            "/api/v1/projects/7/membership",
            Some(&access_token(&app.state, &alice)),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["role"], "admin");
    assert_eq!(response.body["project_id"], 7);
}

#[tokio::test]
async fn test_non_member_gets_not_found() {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice");
    let bob = seed_user(&app.store, "bob");
    app.store
        .add_membership(ProjectId(7), alice.id, ProjectRole::Member, true);
    app.store
        .add_membership(ProjectId(8), bob.id, ProjectRole::Member, false);

    let token = access_token(&app.state, &bob);
    for uri in ["/api/v1/projects/7/membership", "/api/v1/projects/8/membership"] {
        let response = app.get(uri, Some(&token)).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body["detail"], "Project not found");
    }
}

//! Inbound frame handling against a full `AppState`

use pretty_assertions::assert_eq;
use serde_json::Value;
use tasket::backend::realtime::{handle_client_frame, FrameReceiver};
use tasket::backend::ProjectRole;
use tasket::shared::{ProjectId, UserId};

use crate::common::{seed_user, TestApp};

fn next(rx: &mut FrameReceiver) -> Value {
    serde_json::from_str(&rx.try_recv().expect("a frame")).unwrap()
}

#[tokio::test]
async fn test_board_session() {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice");
    let bob = seed_user(&app.store, "bob");
    for user in [&alice, &bob] {
        app.store
            .add_membership(ProjectId(1), user.id, ProjectRole::Member, true);
    }
    let registry = &app.state.registry;
    let access = &app.state.access;

    let (alice_conn, mut alice_rx) = registry.connect(alice.id);
    let (bob_conn, mut bob_rx) = registry.connect(bob.id);

    for (conn, rx) in [(&alice_conn, &mut alice_rx), (&bob_conn, &mut bob_rx)] {
        handle_client_frame(
            r#"{"type":"subscribe_project","project_id":1}"#,
            &conn.handle(),
            registry,
            access,
        )
        .await;
        assert_eq!(next(rx)["type"], "subscribed");
    }

    handle_client_frame(
        r#"{"type":"task_move","task_id":4,"new_status":"in_progress","project_id":1}"#,
        &alice_conn.handle(),
        registry,
        access,
    )
    .await;
    let moved = next(&mut bob_rx);
    assert_eq!(moved["type"], "task_moved");
    assert_eq!(moved["new_status"], "in_progress");
    assert!(alice_rx.try_recv().is_err());

    handle_client_frame(
        r#"{"type":"unsubscribe_project","project_id":1}"#,
        &bob_conn.handle(),
        registry,
        access,
    )
    .await;
    assert_eq!(next(&mut bob_rx)["type"], "unsubscribed");
    assert!(!registry.project_subscribers(ProjectId(1)).contains(&bob.id));
}

#[tokio::test]
async fn test_outsider_cannot_subscribe() {
    let app = TestApp::new();
    let mallory = seed_user(&app.store, "mallory");
    let (conn, mut rx) = app.state.registry.connect(mallory.id);

    handle_client_frame(
        r#"{"type":"subscribe_project","project_id":1}"#,
        &conn.handle(),
        &app.state.registry,
        &app.state.access,
    )
    .await;

    let reply = next(&mut rx);
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["message"], "Project not found");
    assert!(app.state.registry.user_subscriptions(mallory.id).is_empty());
}

#[tokio::test]
async fn test_malformed_known_type() {
    let app = TestApp::new();
    let (conn, mut rx) = app.state.registry.connect(UserId(1));

    handle_client_frame(
        r#"{"type":"task_move","task_id":4}"#,
        &conn.handle(),
        &app.state.registry,
        &app.state.access,
    )
    .await;

    assert_eq!(next(&mut rx)["type"], "error");
}

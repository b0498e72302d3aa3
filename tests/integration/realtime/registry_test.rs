//! Connection registry scenarios

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tasket::backend::realtime::{ConnectionState, FrameReceiver};
use tasket::backend::ConnectionRegistry;
use tasket::shared::{ProjectId, RealtimeEvent, TaskId, UserId};

fn drain(rx: &mut FrameReceiver) -> Vec<Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(serde_json::from_str(&frame).unwrap());
    }
    frames
}

#[test]
fn test_project_broadcast_reaches_every_tab_except_sender() {
    let registry = Arc::new(ConnectionRegistry::new());
    let (_a1, mut a1_rx) = registry.connect(UserId(1));
    let (_a2, mut a2_rx) = registry.connect(UserId(1));
    let (_b, mut b_rx) = registry.connect(UserId(2));
    let (_c, mut c_rx) = registry.connect(UserId(3));
    registry.subscribe(UserId(1), ProjectId(10));
    registry.subscribe(UserId(2), ProjectId(10));

    let delivered = registry.broadcast_to_project(
        &RealtimeEvent::task_deleted(TaskId(5), ProjectId(10)),
        ProjectId(10),
        Some(UserId(2)),
    );

    assert_eq!(delivered, 2);
    assert_eq!(drain(&mut a1_rx).len(), 1);
    assert_eq!(drain(&mut a2_rx).len(), 1);
    assert!(drain(&mut b_rx).is_empty());
    assert!(drain(&mut c_rx).is_empty());
}

#[test]
fn test_closing_last_tab_clears_subscriptions() {
    let registry = Arc::new(ConnectionRegistry::new());
    let (first, _rx1) = registry.connect(UserId(1));
    let (second, _rx2) = registry.connect(UserId(1));
    registry.subscribe(UserId(1), ProjectId(10));
    let handle = first.handle();

    drop(first);
    assert_eq!(registry.connection_state(&handle), ConnectionState::Closed);
    assert!(registry.project_subscribers(ProjectId(10)).contains(&UserId(1)));

    drop(second);
    assert!(registry.project_subscribers(ProjectId(10)).is_empty());
    assert!(registry.user_subscriptions(UserId(1)).is_empty());
    assert!(registry.connected_users().is_empty());
}

#[test]
fn test_closed_receiver_does_not_block_others() {
    let registry = Arc::new(ConnectionRegistry::new());
    let (_gone, gone_rx) = registry.connect(UserId(1));
    let (_live, mut live_rx) = registry.connect(UserId(1));
    drop(gone_rx);

    let delivered =
        registry.send_to_identity(&RealtimeEvent::notification(json!({"id": 1})), UserId(1));

    assert_eq!(delivered, 1);
    assert_eq!(drain(&mut live_rx)[0]["type"], "notification");
}

#[test]
fn test_broadcast_to_all() {
    let registry = Arc::new(ConnectionRegistry::new());
    let (_a, mut a_rx) = registry.connect(UserId(1));
    let (_b, mut b_rx) = registry.connect(UserId(2));

    let delivered = registry.broadcast_to_all(&RealtimeEvent::error("maintenance"));

    assert_eq!(delivered, 2);
    assert_eq!(drain(&mut a_rx)[0]["message"], "maintenance");
    assert_eq!(drain(&mut b_rx)[0]["message"], "maintenance");
}

#[tokio::test]
async fn test_relay_pushes_to_all_tabs() {
    let (state, _store) = tasket::backend::AppState::in_memory(Default::default());
    let (_a1, mut a1_rx) = state.registry.connect(UserId(1));
    let (_a2, mut a2_rx) = state.registry.connect(UserId(1));

    let created = state
        .notifications
        .notify_task_assigned(TaskId(3), "Write docs", ProjectId(2), "Handbook", UserId(1))
        .await
        .unwrap();

    for rx in [&mut a1_rx, &mut a2_rx] {
        let frames = drain(rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["data"]["id"], created.id.0);
        assert_eq!(frames[0]["data"]["title"], "Task assigned: Write docs");
    }
}

//! Property-based tests for the wire types

use proptest::prelude::*;
use serde_json::{json, Value};
use tasket::shared::client::KNOWN_TYPES;
use tasket::shared::{ClientMessage, ProjectId, RealtimeEvent, SharedError, TaskId};

proptest! {
    #[test]
    fn test_unknown_types_are_reported(kind in "[a-z_]{1,20}") {
        prop_assume!(!KNOWN_TYPES.contains(&kind.as_str()));
        let frame = json!({"type": kind, "project_id": 1}).to_string();
        let is_unknown_type = matches!(
            ClientMessage::parse(&frame),
            Err(SharedError::UnknownMessageType { .. })
        );
        prop_assert!(is_unknown_type);
    }

    #[test]
    fn test_pong_echoes_any_timestamp(ts in any::<i64>()) {
        let value = serde_json::to_value(RealtimeEvent::pong(Some(json!(ts)))).unwrap();
        prop_assert_eq!(value, json!({"type": "pong", "timestamp": ts}));
    }

    #[test]
    fn test_task_moved_carries_project(task in any::<i64>(), project in any::<i64>(), status in "[a-z_]{1,12}") {
        let value = serde_json::to_value(
            RealtimeEvent::task_moved(TaskId(task), status.clone(), ProjectId(project)),
        ).unwrap();
        prop_assert_eq!(&value["project_id"], &json!(project));
        prop_assert_eq!(&value["task_id"], &json!(task));
        prop_assert_eq!(&value["new_status"], &Value::String(status));
    }
}

//! Property-based tests for the connection registry

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use proptest::prelude::*;
use tasket::backend::ConnectionRegistry;
use tasket::shared::{ProjectId, RealtimeEvent, TaskId, UserId};

#[derive(Debug, Clone)]
enum Op {
    Subscribe(i64, i64),
    Unsubscribe(i64, i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..4i64, 0..4i64).prop_map(|(u, p)| Op::Subscribe(u, p)),
        (0..4i64, 0..4i64).prop_map(|(u, p)| Op::Unsubscribe(u, p)),
    ]
}

proptest! {
    /// Both subscription indexes always agree with a plain set model
    #[test]
    fn test_subscription_indexes_match_model(ops in prop::collection::vec(op(), 0..40)) {
        let registry = Arc::new(ConnectionRegistry::new());
        let _conns: Vec<_> = (0..4).map(|u| registry.connect(UserId(u))).collect();
        let mut model: HashSet<(i64, i64)> = HashSet::new();

        for op in ops {
            match op {
                Op::Subscribe(u, p) => {
                    prop_assert!(registry.subscribe(UserId(u), ProjectId(p)));
                    model.insert((u, p));
                }
                Op::Unsubscribe(u, p) => {
                    let removed = registry.unsubscribe(UserId(u), ProjectId(p));
                    prop_assert_eq!(removed, model.remove(&(u, p)));
                }
            }
        }

        for u in 0..4 {
            let expected: HashSet<ProjectId> = model
                .iter()
                .filter(|(mu, _)| *mu == u)
                .map(|(_, p)| ProjectId(*p))
                .collect();
            prop_assert_eq!(registry.user_subscriptions(UserId(u)), expected);
        }
        for p in 0..4 {
            let expected: HashSet<UserId> = model
                .iter()
                .filter(|(_, mp)| *mp == p)
                .map(|(u, _)| UserId(*u))
                .collect();
            prop_assert_eq!(registry.project_subscribers(ProjectId(p)), expected);
        }
    }

    /// Subscribing then unsubscribing leaves the registry as it was
    #[test]
    fn test_subscribe_unsubscribe_restores_state(
        existing in prop::collection::hash_set(0..6i64, 0..4),
        project in 0..6i64,
    ) {
        let registry = Arc::new(ConnectionRegistry::new());
        let (_conn, _rx) = registry.connect(UserId(1));
        for p in &existing {
            registry.subscribe(UserId(1), ProjectId(*p));
        }
        prop_assume!(!existing.contains(&project));
        let before = registry.user_subscriptions(UserId(1));

        registry.subscribe(UserId(1), ProjectId(project));
        registry.unsubscribe(UserId(1), ProjectId(project));

        prop_assert_eq!(registry.user_subscriptions(UserId(1)), before);
        prop_assert!(registry.project_subscribers(ProjectId(project)).is_empty());
    }

    /// A project broadcast reaches every tab of every subscriber but the excluded one
    #[test]
    fn test_broadcast_counts(
        tabs in prop::collection::vec(1..4usize, 1..5),
        exclude in 0..5i64,
    ) {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut guards = Vec::new();
        let mut per_user: HashMap<i64, usize> = HashMap::new();
        for (u, count) in tabs.iter().enumerate() {
            let u = u as i64;
            for _ in 0..*count {
                guards.push(registry.connect(UserId(u)));
            }
            registry.subscribe(UserId(u), ProjectId(1));
            per_user.insert(u, *count);
        }

        let delivered = registry.broadcast_to_project(
            &RealtimeEvent::task_deleted(TaskId(1), ProjectId(1)),
            ProjectId(1),
            Some(UserId(exclude)),
        );

        let expected: usize = per_user
            .iter()
            .filter(|(u, _)| **u != exclude)
            .map(|(_, c)| *c)
            .sum();
        prop_assert_eq!(delivered, expected);

        for (registration, rx) in guards.iter_mut() {
            let got = rx.try_recv().is_ok();
            prop_assert_eq!(got, registration.user_id() != UserId(exclude));
        }
    }
}

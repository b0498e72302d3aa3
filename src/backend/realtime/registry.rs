/**
 * Connection Registry
 *
 * In-process index of live WebSocket connections and the projects each user
 * is subscribed to. Everything that pushes to browsers goes through here.
 *
 * # State
 *
 * - `connections`: user -> that user's open connections (a user may have
 *   several tabs open)
 * - `project_subscriptions`: project -> subscribed users
 * - `user_subscriptions`: user -> subscribed projects
 *
 * All three maps sit behind one mutex, so a subscribe or a last-connection
 * cleanup is never observed half-applied. The lock is only held for map
 * bookkeeping and queue pushes, never across an `.await`.
 *
 * # Delivery
 *
 * Each connection owns an unbounded queue drained by its writer task in
 * FIFO order. Pushing a frame never blocks; a queue whose receiver is gone
 * (the socket is closing) is skipped and logged.
 *
 * # Lifecycle
 *
 * `Connecting -> Open -> Closed`. `connect` returns a `Registration` guard;
 * dropping it disconnects, so cleanup runs on every exit path of the socket
 * task, including cancellation at shutdown. When a user's last connection
 * closes, all of that user's subscriptions are removed with it.
 */

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::shared::{ProjectId, RealtimeEvent, UserId};

/// Unique id of one connection
pub type ConnectionId = Uuid;

/// Receiving half of a connection's outbound queue
pub type FrameReceiver = mpsc::UnboundedReceiver<String>;

/// Per-connection lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Upgrade in progress, not yet registered
    Connecting,
    /// Registered and receiving frames
    Open,
    /// Removed from the registry
    Closed,
}

/// Identifies one registered connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub user_id: UserId,
}

struct Connection {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<String>,
}

#[derive(Default)]
struct RegistryState {
    connections: HashMap<UserId, Vec<Connection>>,
    project_subscriptions: HashMap<ProjectId, HashSet<UserId>>,
    user_subscriptions: HashMap<UserId, HashSet<ProjectId>>,
}

impl RegistryState {
    fn remove_subscription(&mut self, user_id: UserId, project_id: ProjectId) -> bool {
        let mut removed = false;
        if let Some(users) = self.project_subscriptions.get_mut(&project_id) {
            removed = users.remove(&user_id);
            if users.is_empty() {
                self.project_subscriptions.remove(&project_id);
            }
        }
        if let Some(projects) = self.user_subscriptions.get_mut(&user_id) {
            projects.remove(&project_id);
            if projects.is_empty() {
                self.user_subscriptions.remove(&user_id);
            }
        }
        removed
    }

    fn senders_for(&self, user_id: UserId) -> impl Iterator<Item = Target> + '_ {
        self.connections
            .get(&user_id)
            .into_iter()
            .flatten()
            .map(move |conn| Target {
                user_id,
                connection_id: conn.id,
                tx: conn.tx.clone(),
            })
    }
}

struct Target {
    user_id: UserId,
    connection_id: ConnectionId,
    tx: mpsc::UnboundedSender<String>,
}

/// Registry of live connections and project subscriptions
#[derive(Default)]
pub struct ConnectionRegistry {
    state: Mutex<RegistryState>,
}

/// Guard for one registered connection; disconnects when dropped
pub struct Registration {
    registry: Arc<ConnectionRegistry>,
    handle: ConnectionHandle,
}

impl Registration {
    pub fn handle(&self) -> ConnectionHandle {
        self.handle
    }

    pub fn id(&self) -> ConnectionId {
        self.handle.id
    }

    pub fn user_id(&self) -> UserId {
        self.handle.user_id
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.disconnect(self.handle.user_id, self.handle.id);
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration").field("handle", &self.handle).finish()
    }
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new open connection for `user_id`
    ///
    /// # Returns
    /// The guard that keeps the connection registered, and the queue its
    /// writer task should drain
    pub fn connect(self: &Arc<Self>, user_id: UserId) -> (Registration, FrameReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();

        let count = {
            let mut state = self.lock();
            let conns = state.connections.entry(user_id).or_default();
            conns.push(Connection { id, tx });
            conns.len()
        };

        tracing::info!(
            user_id = %user_id,
            connection_id = %id,
            connections = count,
            "[Realtime] Connection opened"
        );

        let registration = Registration {
            registry: Arc::clone(self),
            handle: ConnectionHandle { id, user_id },
        };
        (registration, rx)
    }

    /// Remove one connection
    ///
    /// If it was the user's last connection, every subscription the user held
    /// is removed too. Unknown connections are ignored.
    ///
    /// # Returns
    /// `true` if a connection was removed
    pub fn disconnect(&self, user_id: UserId, connection_id: ConnectionId) -> bool {
        let mut state = self.lock();

        let Some(conns) = state.connections.get_mut(&user_id) else {
            return false;
        };
        let before = conns.len();
        conns.retain(|c| c.id != connection_id);
        if conns.len() == before {
            return false;
        }

        if conns.is_empty() {
            state.connections.remove(&user_id);
            let projects = state.user_subscriptions.remove(&user_id).unwrap_or_default();
            for project_id in projects {
                state.remove_subscription(user_id, project_id);
            }
            tracing::info!(
                user_id = %user_id,
                connection_id = %connection_id,
                "[Realtime] Last connection closed, subscriptions cleared"
            );
        } else {
            tracing::info!(
                user_id = %user_id,
                connection_id = %connection_id,
                "[Realtime] Connection closed"
            );
        }
        true
    }

    pub fn connection_state(&self, handle: &ConnectionHandle) -> ConnectionState {
        let state = self.lock();
        let open = state
            .connections
            .get(&handle.user_id)
            .is_some_and(|conns| conns.iter().any(|c| c.id == handle.id));
        if open {
            ConnectionState::Open
        } else {
            ConnectionState::Closed
        }
    }

    /// Subscribe a user to a project's events
    ///
    /// Idempotent. A user without an open connection cannot hold
    /// subscriptions, so the call is ignored in that case.
    ///
    /// # Returns
    /// `true` if the subscription is in place after the call
    pub fn subscribe(&self, user_id: UserId, project_id: ProjectId) -> bool {
        let mut state = self.lock();
        if !state.connections.contains_key(&user_id) {
            tracing::debug!(
                user_id = %user_id,
                project_id = %project_id,
                "[Realtime] Subscribe ignored, user has no open connection"
            );
            return false;
        }
        state
            .project_subscriptions
            .entry(project_id)
            .or_default()
            .insert(user_id);
        state
            .user_subscriptions
            .entry(user_id)
            .or_default()
            .insert(project_id);
        true
    }

    /// Inverse of `subscribe`; empty sets are pruned
    ///
    /// # Returns
    /// `true` if a subscription was removed
    pub fn unsubscribe(&self, user_id: UserId, project_id: ProjectId) -> bool {
        self.lock().remove_subscription(user_id, project_id)
    }

    /// Deliver to every open connection of one user
    ///
    /// # Returns
    /// Number of connections the frame was queued on
    pub fn send_to_identity(&self, event: &RealtimeEvent, user_id: UserId) -> usize {
        let Some(frame) = encode(event) else {
            return 0;
        };
        let targets: Vec<Target> = self.lock().senders_for(user_id).collect();
        deliver(&frame, targets)
    }

    /// Deliver to a single connection (replies to that socket's own frames)
    pub fn send_to_connection(&self, handle: &ConnectionHandle, event: &RealtimeEvent) -> bool {
        let Some(frame) = encode(event) else {
            return false;
        };
        let targets: Vec<Target> = self
            .lock()
            .senders_for(handle.user_id)
            .filter(|t| t.connection_id == handle.id)
            .collect();
        deliver(&frame, targets) > 0
    }

    /// Deliver to every subscriber of a project except `exclude`
    pub fn broadcast_to_project(
        &self,
        event: &RealtimeEvent,
        project_id: ProjectId,
        exclude: Option<UserId>,
    ) -> usize {
        let Some(frame) = encode(event) else {
            return 0;
        };
        let targets: Vec<Target> = {
            let guard = self.lock();
            let state: &RegistryState = &guard;
            match state.project_subscriptions.get(&project_id) {
                Some(users) => users
                    .iter()
                    .filter(|user_id| Some(**user_id) != exclude)
                    .flat_map(|user_id| state.senders_for(*user_id))
                    .collect(),
                None => Vec::new(),
            }
        };
        let delivered = deliver(&frame, targets);
        tracing::debug!(
            project_id = %project_id,
            kind = event.message.kind(),
            delivered,
            "[Realtime] Project broadcast"
        );
        delivered
    }

    /// Deliver to every connected user
    pub fn broadcast_to_all(&self, event: &RealtimeEvent) -> usize {
        let Some(frame) = encode(event) else {
            return 0;
        };
        let targets: Vec<Target> = {
            let guard = self.lock();
            let state: &RegistryState = &guard;
            state
                .connections
                .keys()
                .flat_map(|user_id| state.senders_for(*user_id))
                .collect()
        };
        deliver(&frame, targets)
    }

    /// Users with at least one open connection, ascending
    pub fn connected_users(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self.lock().connections.keys().copied().collect();
        users.sort();
        users
    }

    pub fn project_subscribers(&self, project_id: ProjectId) -> HashSet<UserId> {
        self.lock()
            .project_subscriptions
            .get(&project_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn user_subscriptions(&self, user_id: UserId) -> HashSet<ProjectId> {
        self.lock()
            .user_subscriptions
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Open connections held by one user
    pub fn connection_count(&self, user_id: UserId) -> usize {
        self.lock().connections.get(&user_id).map_or(0, Vec::len)
    }

    /// Open connections across all users
    pub fn total_connections(&self) -> usize {
        self.lock().connections.values().map(Vec::len).sum()
    }
}

fn encode(event: &RealtimeEvent) -> Option<String> {
    match event.to_frame() {
        Ok(frame) => Some(frame),
        Err(e) => {
            tracing::error!(
                "[Realtime] Failed to serialize {} event: {}",
                event.message.kind(),
                e
            );
            None
        }
    }
}

fn deliver(frame: &str, targets: Vec<Target>) -> usize {
    let mut delivered = 0;
    for target in targets {
        match target.tx.send(frame.to_string()) {
            Ok(()) => delivered += 1,
            Err(_) => {
                tracing::warn!(
                    user_id = %target.user_id,
                    connection_id = %target.connection_id,
                    "[Realtime] Dropping frame for closed connection"
                );
            }
        }
    }
    delivered
}

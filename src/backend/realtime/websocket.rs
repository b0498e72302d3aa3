/**
 * WebSocket Endpoint
 *
 * GET /api/v1/ws/{user_id}
 *
 * The route sits behind the auth gate like every other gated route, and
 * the `user_id` in the path must be the caller's own id. After the upgrade
 * the socket is registered with the `ConnectionRegistry` and split in two:
 *
 * - a writer task draining the connection's queue into the socket
 * - the reader loop below, handling inbound frames one at a time
 *
 * # Inbound Frames
 *
 * | type                  | effect |
 * |-----------------------|--------|
 * | `subscribe_project`   | member check, subscribe, reply `subscribed` |
 * | `unsubscribe_project` | unsubscribe, reply `unsubscribed` |
 * | `ping`                | reply `pong` echoing the client timestamp |
 * | `task_move`           | member check, `task_moved` to the project minus the sender |
 * | `estimation_vote`     | member check, `estimation_vote` to the whole project |
 *
 * Anything that cannot be handled is answered with an `error` frame on the
 * same socket.
 */

use std::time::Duration;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::{IntoResponse, Response},
};
use futures_util::{Sink, SinkExt, StreamExt};
use serde_json::json;

use crate::backend::access::{AccessPolicy, ProjectRole};
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiPath, AuthUser};
use crate::backend::realtime::registry::{ConnectionHandle, ConnectionRegistry, FrameReceiver};
use crate::backend::server::AppState;
use crate::shared::{ClientMessage, ProjectId, RealtimeEvent, UserId};

/// Upgrade handler
///
/// # Errors
///
/// * `401 Unauthorized` - From the auth gate
/// * `404 Not Found` - `user_id` is not the caller
pub async fn websocket_handler(
    AuthUser(user): AuthUser,
    ApiPath(user_id): ApiPath<UserId>,
    State(state): State<AppState>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, BackendError> {
    if user.id != user_id {
        tracing::warn!(
            caller = %user.id,
            requested = %user_id,
            "[Realtime] WebSocket for another user refused"
        );
        return Err(BackendError::not_found("Connection target not found"));
    }

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    tracing::debug!(user_id = %user_id, "[Realtime] Upgrading connection");
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, user_id, state)))
}

/// How long a closing socket may spend flushing frames already queued
const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

async fn handle_socket(socket: WebSocket, user_id: UserId, state: AppState) {
    let (sender, mut receiver) = socket.split();
    let (registration, rx) = state.registry.connect(user_id);
    let handle = registration.handle();

    let mut send_task = tokio::spawn(write_frames(rx, sender));

    while let Some(msg_result) = receiver.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                handle_client_frame(text.as_str(), &handle, &state.registry, &state.access).await;
            }
            Ok(Message::Binary(_)) => {
                reply(&state.registry, &handle, RealtimeEvent::error("Binary frames are not supported"));
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Handled automatically by axum
            }
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    connection_id = %handle.id,
                    error = %e,
                    "[Realtime] WebSocket error"
                );
                break;
            }
        }
    }

    // Unregistering closes the queue, so the writer ends once it is drained
    drop(registration);
    if tokio::time::timeout(FLUSH_TIMEOUT, &mut send_task).await.is_err() {
        tracing::debug!(
            user_id = %user_id,
            connection_id = %handle.id,
            "[Realtime] Writer did not flush in time"
        );
        send_task.abort();
    }
}

/// Forward queued frames to the socket until the queue closes or a send fails
///
/// Returns the sink so the caller can inspect or reuse it.
pub async fn write_frames<S>(mut rx: FrameReceiver, mut sink: S) -> S
where
    S: Sink<Message> + Unpin,
{
    while let Some(frame) = rx.recv().await {
        if sink.send(Message::Text(frame.into())).await.is_err() {
            break;
        }
    }
    sink
}

/// Handle one inbound text frame from `handle`'s socket
///
/// Replies go to the originating connection only; broadcasts go through the
/// registry. Never fails: every problem becomes an `error` reply.
pub async fn handle_client_frame(
    text: &str,
    handle: &ConnectionHandle,
    registry: &ConnectionRegistry,
    access: &AccessPolicy,
) {
    let user_id = handle.user_id;

    let message = match ClientMessage::parse(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(user_id = %user_id, "[Realtime] Rejected frame: {}", e);
            reply(registry, handle, RealtimeEvent::error(e.to_string()));
            return;
        }
    };

    match message {
        ClientMessage::SubscribeProject { project_id } => {
            if let Err(reason) = ensure_member(access, user_id, project_id).await {
                reply(registry, handle, RealtimeEvent::error(reason));
                return;
            }
            registry.subscribe(user_id, project_id);
            reply(registry, handle, RealtimeEvent::subscribed(project_id));
        }
        ClientMessage::UnsubscribeProject { project_id } => {
            registry.unsubscribe(user_id, project_id);
            reply(registry, handle, RealtimeEvent::unsubscribed(project_id));
        }
        ClientMessage::Ping { timestamp } => {
            reply(registry, handle, RealtimeEvent::pong(timestamp));
        }
        ClientMessage::TaskMove {
            task_id,
            new_status,
            project_id,
        } => {
            if let Err(reason) = ensure_member(access, user_id, project_id).await {
                reply(registry, handle, RealtimeEvent::error(reason));
                return;
            }
            let event = RealtimeEvent::task_moved(task_id, new_status, project_id);
            registry.broadcast_to_project(&event, project_id, Some(user_id));
        }
        ClientMessage::EstimationVote {
            task_id,
            vote_value,
            project_id,
        } => {
            if let Err(reason) = ensure_member(access, user_id, project_id).await {
                reply(registry, handle, RealtimeEvent::error(reason));
                return;
            }
            let data = json!({
                "task_id": task_id,
                "user_id": user_id,
                "vote_value": vote_value,
            });
            registry.broadcast_to_project(&RealtimeEvent::estimation_vote(data, project_id), project_id, None);
        }
    }
}

async fn ensure_member(
    access: &AccessPolicy,
    user_id: UserId,
    project_id: ProjectId,
) -> Result<(), String> {
    match access.has_role(user_id, project_id, ProjectRole::Member).await {
        Ok(true) => Ok(()),
        Ok(false) => {
            tracing::warn!(
                user_id = %user_id,
                project_id = %project_id,
                "[Realtime] Project access refused"
            );
            Err("Project not found".to_string())
        }
        Err(e) => {
            tracing::error!(
                user_id = %user_id,
                project_id = %project_id,
                "[Realtime] Membership lookup failed: {}",
                e
            );
            Err("Internal server error".to_string())
        }
    }
}

fn reply(registry: &ConnectionRegistry, handle: &ConnectionHandle, event: RealtimeEvent) {
    if !registry.send_to_connection(handle, &event) {
        tracing::debug!(
            connection_id = %handle.id,
            "[Realtime] Reply dropped, connection already gone"
        );
    }
}

/**
 * API Route Handlers
 *
 * Everything under the API prefix (`/api/v1` by default).
 *
 * # Routes
 *
 * ## Authentication (public)
 * - `POST {api}/auth/register` - Password account registration
 * - `POST {api}/auth/login` - Email + password login
 * - `POST {api}/auth/refresh` - New access token from a refresh token
 * - `POST {api}/auth/oauth/user` - Get or create a federated user
 * - `POST {api}/auth/exchange-token` - Tokens for a linked provider account
 *
 * ## Gated
 * - `GET {api}/auth/me` - Current user
 * - `GET {api}/notifications` - List notifications
 * - `GET {api}/notifications/unread-count`
 * - `PATCH {api}/notifications/{id}/read`
 * - `PATCH {api}/notifications/mark-all-read`
 * - `GET {api}/projects/{project_id}/membership` - Caller's role
 * - `GET {api}/ws/{user_id}` - WebSocket
 *
 * Which routes are public is decided by the auth gate's exemption list,
 * not here.
 */

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::backend::access::handlers::get_membership;
use crate::backend::auth::{exchange_token, get_me, login, oauth_user, refresh, register};
use crate::backend::notifications::handlers::{
    list_notifications, mark_all_read, mark_read, unread_count,
};
use crate::backend::realtime::websocket_handler;
use crate::backend::server::AppState;

/// Add the API routes under `api_prefix`
pub fn configure_api_routes(router: Router<AppState>, api_prefix: &str) -> Router<AppState> {
    let api = api_prefix.trim_end_matches('/');

    router
        // Authentication endpoints
        .route(&format!("{}/auth/register", api), post(register))
        .route(&format!("{}/auth/login", api), post(login))
        .route(&format!("{}/auth/refresh", api), post(refresh))
        .route(&format!("{}/auth/oauth/user", api), post(oauth_user))
        .route(&format!("{}/auth/exchange-token", api), post(exchange_token))
        .route(&format!("{}/auth/me", api), get(get_me))
        // Notifications
        .route(&format!("{}/notifications", api), get(list_notifications))
        .route(
            &format!("{}/notifications/unread-count", api),
            get(unread_count),
        )
        .route(
            &format!("{}/notifications/mark-all-read", api),
            patch(mark_all_read),
        )
        .route(&format!("{}/notifications/{{id}}/read", api), patch(mark_read))
        // Projects
        .route(
            &format!("{}/projects/{{project_id}}/membership", api),
            get(get_membership),
        )
        // Real-time
        .route(&format!("{}/ws/{{user_id}}", api), get(websocket_handler))
}

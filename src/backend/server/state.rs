/**
 * Application State Management
 *
 * `AppState` is the central state container handed to every handler. It is
 * cheap to clone: every component is behind an `Arc` or is itself a thin
 * handle over `Arc`s.
 *
 * # Components
 *
 * - `settings` - Loaded configuration
 * - `tokens` - Token Service (stateless)
 * - `users` - User store used by the auth gate and auth handlers
 * - `access` - Access Policy over the membership store
 * - `registry` - Connection Registry (the only shared mutable state)
 * - `notifications` - Notification Relay
 * - `db_pool` - PostgreSQL pool, `None` when running on in-memory stores
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers take a single component, e.g.
 * `State(registry): State<Arc<ConnectionRegistry>>`.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::backend::access::AccessPolicy;
use crate::backend::auth::tokens::TokenService;
use crate::backend::notifications::NotificationRelay;
use crate::backend::realtime::ConnectionRegistry;
use crate::backend::server::config::Settings;
use crate::backend::storage::{MemoryStore, MembershipStore, NotificationStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserStore>,
    pub access: AccessPolicy,
    pub registry: Arc<ConnectionRegistry>,
    pub notifications: NotificationRelay,
    /// `None` if `DATABASE_URL` is unset or unreachable
    pub db_pool: Option<PgPool>,
}

impl AppState {
    /// Assemble the state from explicit stores
    pub fn with_stores(
        settings: Settings,
        users: Arc<dyn UserStore>,
        memberships: Arc<dyn MembershipStore>,
        notifications: Arc<dyn NotificationStore>,
        db_pool: Option<PgPool>,
    ) -> Self {
        let tokens = TokenService::new(
            &settings.secret_key,
            settings.access_token_ttl(),
            settings.refresh_token_ttl(),
        );
        let registry = Arc::new(ConnectionRegistry::new());

        Self {
            settings: Arc::new(settings),
            tokens: Arc::new(tokens),
            users,
            access: AccessPolicy::new(memberships),
            notifications: NotificationRelay::new(notifications, registry.clone()),
            registry,
            db_pool,
        }
    }

    /// State backed by a fresh `MemoryStore`, which is returned for seeding
    pub fn in_memory(settings: Settings) -> (Self, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let state = Self::with_stores(settings, store.clone(), store.clone(), store.clone(), None);
        (state, store)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("settings", &self.settings)
            .field("connections", &self.registry.total_connections())
            .field("database", &self.db_pool.is_some())
            .finish()
    }
}

impl FromRef<AppState> for Arc<Settings> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.settings.clone()
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for AccessPolicy {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.access.clone()
    }
}

impl FromRef<AppState> for Arc<ConnectionRegistry> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.registry.clone()
    }
}

impl FromRef<AppState> for NotificationRelay {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.notifications.clone()
    }
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

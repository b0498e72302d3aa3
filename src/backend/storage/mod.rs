//! Storage backends for Tasket
//!
//! The auth gate, access policy and notification relay only see these
//! traits. Two implementations exist:
//!
//! - `PgStore`: PostgreSQL through `sqlx`, used when `DATABASE_URL` is set
//! - `MemoryStore`: process-local maps, used by tests and database-less runs

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::backend::access::ProjectMembership;
use crate::backend::auth::users::{NewOAuthAccount, NewUser, OAuthAccount, User};
use crate::backend::notifications::{NewNotification, Notification};
use crate::shared::{NotificationId, ProjectId, UserId};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound(err.to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(db.message().to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

/// Accounts and their linked OAuth identities
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by id
    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError>;

    /// Look up a user by email (exact match)
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    /// Whether a username is already taken
    async fn username_exists(&self, username: &str) -> Result<bool, StorageError>;

    /// Insert a new user
    async fn create_user(&self, user: NewUser) -> Result<User, StorageError>;

    /// Overwrite the display fields of a user
    async fn update_profile(
        &self,
        id: UserId,
        full_name: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<User, StorageError>;

    /// Stamp the last successful login
    async fn record_login(&self, id: UserId) -> Result<(), StorageError>;

    /// Find the account linked for `(provider, account_id)`
    async fn find_oauth_account(
        &self,
        provider: &str,
        account_id: &str,
    ) -> Result<Option<OAuthAccount>, StorageError>;

    /// Link a provider account to a user
    async fn link_oauth_account(
        &self,
        account: NewOAuthAccount,
    ) -> Result<OAuthAccount, StorageError>;
}

/// Read-only view of project memberships
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Membership row for `(project, user)`, active or not
    async fn get_membership(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> Result<Option<ProjectMembership>, StorageError>;
}

/// Persisted notifications
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, StorageError>;

    /// Newest first
    async fn list_notifications(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
        unread_only: bool,
    ) -> Result<Vec<Notification>, StorageError>;

    async fn count_notifications(&self, user_id: UserId) -> Result<i64, StorageError>;

    async fn count_unread(&self, user_id: UserId) -> Result<i64, StorageError>;

    /// Mark one notification read; filters on both ids, false if nothing matched
    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: UserId,
    ) -> Result<bool, StorageError>;

    /// Mark every unread notification of a user read, returns how many changed
    async fn mark_all_read(&self, user_id: UserId) -> Result<u64, StorageError>;
}

//! PostgreSQL storage backend
//!
//! Thin adapter from the storage traits onto the query functions that live
//! next to each model (`auth::users`, `access::db`, `notifications::db`).

use async_trait::async_trait;
use sqlx::PgPool;

use crate::backend::access::{self, ProjectMembership};
use crate::backend::auth::users::{self, NewOAuthAccount, NewUser, OAuthAccount, User};
use crate::backend::notifications::{self, NewNotification, Notification};
use crate::backend::storage::{MembershipStore, NotificationStore, StorageError, UserStore};
use crate::shared::{NotificationId, ProjectId, UserId};

/// PostgreSQL-backed implementation of every store trait
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        Ok(users::get_user_by_id(&self.pool, id).await?)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        Ok(users::get_user_by_email(&self.pool, email).await?)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, StorageError> {
        Ok(users::username_exists(&self.pool, username).await?)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StorageError> {
        Ok(users::create_user(&self.pool, user).await?)
    }

    async fn update_profile(
        &self,
        id: UserId,
        full_name: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<User, StorageError> {
        Ok(users::update_profile(&self.pool, id, full_name, avatar_url).await?)
    }

    async fn record_login(&self, id: UserId) -> Result<(), StorageError> {
        Ok(users::record_login(&self.pool, id).await?)
    }

    async fn find_oauth_account(
        &self,
        provider: &str,
        account_id: &str,
    ) -> Result<Option<OAuthAccount>, StorageError> {
        Ok(users::find_oauth_account(&self.pool, provider, account_id).await?)
    }

    async fn link_oauth_account(
        &self,
        account: NewOAuthAccount,
    ) -> Result<OAuthAccount, StorageError> {
        Ok(users::create_oauth_account(&self.pool, account).await?)
    }
}

#[async_trait]
impl MembershipStore for PgStore {
    async fn get_membership(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> Result<Option<ProjectMembership>, StorageError> {
        access::db::get_membership(&self.pool, project_id, user_id).await
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, StorageError> {
        Ok(notifications::db::create_notification(&self.pool, notification).await?)
    }

    async fn list_notifications(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
        unread_only: bool,
    ) -> Result<Vec<Notification>, StorageError> {
        Ok(notifications::db::get_notifications(&self.pool, user_id, limit, offset, unread_only).await?)
    }

    async fn count_notifications(&self, user_id: UserId) -> Result<i64, StorageError> {
        Ok(notifications::db::count_notifications(&self.pool, user_id).await?)
    }

    async fn count_unread(&self, user_id: UserId) -> Result<i64, StorageError> {
        Ok(notifications::db::count_unread(&self.pool, user_id).await?)
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: UserId,
    ) -> Result<bool, StorageError> {
        Ok(notifications::db::mark_read(&self.pool, id, user_id).await?)
    }

    async fn mark_all_read(&self, user_id: UserId) -> Result<u64, StorageError> {
        Ok(notifications::db::mark_all_read(&self.pool, user_id).await?)
    }
}

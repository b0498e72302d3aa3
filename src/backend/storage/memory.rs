//! In-memory storage backend
//!
//! Implements every store trait over plain maps. Used by the test suite and
//! when the server starts without `DATABASE_URL`; nothing survives a restart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::backend::access::{ProjectMembership, ProjectRole};
use crate::backend::auth::users::{NewOAuthAccount, NewUser, OAuthAccount, User};
use crate::backend::notifications::{NewNotification, Notification};
use crate::backend::storage::{MembershipStore, NotificationStore, StorageError, UserStore};
use crate::shared::{NotificationId, ProjectId, UserId};

#[derive(Default)]
struct MemoryData {
    users: HashMap<UserId, User>,
    oauth_accounts: Vec<OAuthAccount>,
    memberships: HashMap<(ProjectId, UserId), ProjectMembership>,
    notifications: Vec<Notification>,
    next_user_id: i64,
    next_oauth_id: i64,
    next_notification_id: i64,
}

/// Process-local store
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a user directly, bypassing uniqueness checks
    pub fn add_user(&self, user: NewUser) -> User {
        let mut data = self.lock();
        insert_user(&mut data, user)
    }

    /// Insert or replace a membership row
    pub fn add_membership(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        role: ProjectRole,
        is_active: bool,
    ) {
        self.lock().memberships.insert(
            (project_id, user_id),
            ProjectMembership {
                project_id,
                user_id,
                role,
                is_active,
            },
        );
    }

    /// Flip a user's active flag
    pub fn set_active(&self, user_id: UserId, is_active: bool) {
        if let Some(user) = self.lock().users.get_mut(&user_id) {
            user.is_active = is_active;
        }
    }

    /// Every notification stored for a user, oldest first
    pub fn notifications_for(&self, user_id: UserId) -> Vec<Notification> {
        self.lock()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }
}

fn insert_user(data: &mut MemoryData, user: NewUser) -> User {
    data.next_user_id += 1;
    let id = UserId(data.next_user_id);
    let record = User {
        id,
        email: user.email,
        username: user.username,
        full_name: user.full_name,
        hashed_password: user.hashed_password,
        is_active: user.is_active,
        is_verified: user.is_verified,
        avatar_url: user.avatar_url,
        created_at: Utc::now(),
        last_login: None,
    };
    data.users.insert(id, record.clone());
    record
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        Ok(self.lock().users.values().find(|u| u.email == email).cloned())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, StorageError> {
        Ok(self.lock().users.values().any(|u| u.username == username))
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StorageError> {
        let mut data = self.lock();
        if data.users.values().any(|u| u.email == user.email) {
            return Err(StorageError::Conflict("Email already registered".to_string()));
        }
        if data.users.values().any(|u| u.username == user.username) {
            return Err(StorageError::Conflict("Username already taken".to_string()));
        }
        Ok(insert_user(&mut data, user))
    }

    async fn update_profile(
        &self,
        id: UserId,
        full_name: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<User, StorageError> {
        let mut data = self.lock();
        let user = data
            .users
            .get_mut(&id)
            .ok_or_else(|| StorageError::NotFound(format!("user {}", id)))?;
        user.full_name = full_name;
        user.avatar_url = avatar_url;
        Ok(user.clone())
    }

    async fn record_login(&self, id: UserId) -> Result<(), StorageError> {
        if let Some(user) = self.lock().users.get_mut(&id) {
            user.last_login = Some(Utc::now());
        }
        Ok(())
    }

    async fn find_oauth_account(
        &self,
        provider: &str,
        account_id: &str,
    ) -> Result<Option<OAuthAccount>, StorageError> {
        Ok(self
            .lock()
            .oauth_accounts
            .iter()
            .find(|a| a.oauth_name == provider && a.account_id == account_id)
            .cloned())
    }

    async fn link_oauth_account(
        &self,
        account: NewOAuthAccount,
    ) -> Result<OAuthAccount, StorageError> {
        let mut data = self.lock();
        if data
            .oauth_accounts
            .iter()
            .any(|a| a.oauth_name == account.oauth_name && a.account_id == account.account_id)
        {
            return Err(StorageError::Conflict("OAuth account already linked".to_string()));
        }
        data.next_oauth_id += 1;
        let record = OAuthAccount {
            id: data.next_oauth_id,
            oauth_name: account.oauth_name,
            account_id: account.account_id,
            account_email: account.account_email,
            user_id: account.user_id,
        };
        data.oauth_accounts.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl MembershipStore for MemoryStore {
    async fn get_membership(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> Result<Option<ProjectMembership>, StorageError> {
        Ok(self.lock().memberships.get(&(project_id, user_id)).cloned())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, StorageError> {
        let mut data = self.lock();
        data.next_notification_id += 1;
        let record = Notification {
            id: NotificationId(data.next_notification_id),
            user_id: notification.user_id,
            title: notification.title,
            message: notification.message,
            project_id: notification.project_id,
            task_id: notification.task_id,
            is_read: false,
            created_at: Utc::now(),
            read_at: None,
        };
        data.notifications.push(record.clone());
        Ok(record)
    }

    async fn list_notifications(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
        unread_only: bool,
    ) -> Result<Vec<Notification>, StorageError> {
        let data = self.lock();
        // Insertion order doubles as creation order
        Ok(data
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.is_read))
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count_notifications(&self, user_id: UserId) -> Result<i64, StorageError> {
        Ok(self
            .lock()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .count() as i64)
    }

    async fn count_unread(&self, user_id: UserId) -> Result<i64, StorageError> {
        Ok(self
            .lock()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count() as i64)
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: UserId,
    ) -> Result<bool, StorageError> {
        let mut data = self.lock();
        match data
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(notification) => {
                notification.is_read = true;
                notification.read_at.get_or_insert_with(Utc::now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: UserId) -> Result<u64, StorageError> {
        let now = Utc::now();
        let mut count = 0;
        for notification in self
            .lock()
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            notification.is_read = true;
            notification.read_at = Some(now);
            count += 1;
        }
        Ok(count)
    }
}

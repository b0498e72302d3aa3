/**
 * Project Access Policy
 *
 * Role checks over project memberships. Memberships are re-read on every
 * call; nothing is cached and nothing is written.
 */

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::backend::error::BackendError;
use crate::backend::storage::{MembershipStore, StorageError};
use crate::shared::{ProjectId, UserId};

/// Role within a project, ordered `Member < Admin`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    Member,
    Admin,
}

impl ProjectRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown project role: {}", other)),
        }
    }
}

/// A user's membership record in one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMembership {
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub role: ProjectRole,
    pub is_active: bool,
}

/// Role-gated authorization over project memberships
#[derive(Clone)]
pub struct AccessPolicy {
    memberships: Arc<dyn MembershipStore>,
}

impl AccessPolicy {
    pub fn new(memberships: Arc<dyn MembershipStore>) -> Self {
        Self { memberships }
    }

    /// The caller's role in a project, `None` if absent or inactive
    pub async fn role_of(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> Result<Option<ProjectRole>, StorageError> {
        let membership = self.memberships.get_membership(project_id, user_id).await?;
        Ok(membership.filter(|m| m.is_active).map(|m| m.role))
    }

    /// Whether the user holds at least `min_role` in the project
    ///
    /// # Arguments
    /// * `user_id` - Identity to check
    /// * `project_id` - Project being accessed
    /// * `min_role` - Lowest role that is allowed through
    ///
    /// # Returns
    /// `false` for a missing or inactive membership, otherwise `role >= min_role`
    pub async fn has_role(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        min_role: ProjectRole,
    ) -> Result<bool, StorageError> {
        Ok(self
            .role_of(user_id, project_id)
            .await?
            .is_some_and(|role| role >= min_role))
    }

    /// Like `has_role`, but a refusal becomes `NotFound` so the caller
    /// cannot tell a private project from a missing one
    pub async fn require_role(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        min_role: ProjectRole,
    ) -> Result<(), BackendError> {
        if self.has_role(user_id, project_id, min_role).await? {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %user_id,
                project_id = %project_id,
                min_role = %min_role,
                "Project access refused"
            );
            Err(BackendError::not_found("Project not found"))
        }
    }
}

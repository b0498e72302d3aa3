//! Database operations for project memberships

use sqlx::{PgPool, Row};

use crate::backend::access::policy::{ProjectMembership, ProjectRole};
use crate::backend::storage::StorageError;
use crate::shared::{ProjectId, UserId};

/// Get the membership row for a user in a project
pub async fn get_membership(
    pool: &PgPool,
    project_id: ProjectId,
    user_id: UserId,
) -> Result<Option<ProjectMembership>, StorageError> {
    let row = sqlx::query(
        r#"
        SELECT project_id, user_id, role, is_active
        FROM project_members
        WHERE project_id = $1 AND user_id = $2
        "#,
    )
    .bind(project_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let role: String = row.get("role");
    let role = role
        .parse::<ProjectRole>()
        .map_err(|_| StorageError::Corrupt(format!("unknown project role '{}'", role)))?;

    Ok(Some(ProjectMembership {
        project_id: row.get("project_id"),
        user_id: row.get("user_id"),
        role,
        is_active: row.get("is_active"),
    }))
}

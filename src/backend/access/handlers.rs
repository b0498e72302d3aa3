/**
 * Membership Handler
 *
 * GET /api/v1/projects/{project_id}/membership
 *
 * Reports the caller's role in a project. A caller without an active
 * membership gets the same 404 as for a project that does not exist.
 */

use axum::{
    extract::State,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::backend::access::policy::ProjectRole;
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiPath, AuthUser};
use crate::backend::server::AppState;
use crate::shared::{ProjectId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipResponse {
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub role: ProjectRole,
}

pub async fn get_membership(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(project_id): ApiPath<ProjectId>,
) -> Result<Json<MembershipResponse>, BackendError> {
    let role = state
        .access
        .role_of(user.id, project_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Project not found"))?;

    Ok(Json(MembershipResponse {
        project_id,
        user_id: user.id,
        role,
    }))
}

/**
 * Get Current User Handler
 *
 * GET /api/v1/auth/me
 *
 * The auth gate has already resolved the caller; this just renders it.
 */

use axum::response::Json;

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::middleware::AuthUser;

/// Get current user handler
///
/// # Example Response
///
/// ```json
/// {
///   "id": 42,
///   "email": "user@example.com",
///   "username": "user",
///   "full_name": null,
///   "avatar_url": null,
///   "is_active": true,
///   "is_verified": true,
///   "created_at": "2024-05-01T10:00:00Z"
/// }
/// ```
pub async fn get_me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(user.into())
}

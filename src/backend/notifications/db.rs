//! Database operations for notifications

use sqlx::PgPool;

use crate::backend::notifications::{NewNotification, Notification};
use crate::shared::{NotificationId, UserId};

const COLUMNS: &str = "id, user_id, title, message, project_id, task_id, is_read, created_at, read_at";

/// Insert a notification
pub async fn create_notification(
    pool: &PgPool,
    notification: NewNotification,
) -> Result<Notification, sqlx::Error> {
    sqlx::query_as::<_, Notification>(&format!(
        r#"
        INSERT INTO notifications (user_id, title, message, project_id, task_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {}
        "#,
        COLUMNS
    ))
    .bind(notification.user_id)
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(notification.project_id)
    .bind(notification.task_id)
    .fetch_one(pool)
    .await
}

/// Get a page of a user's notifications, newest first
pub async fn get_notifications(
    pool: &PgPool,
    user_id: UserId,
    limit: i64,
    offset: i64,
    unread_only: bool,
) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(&format!(
        r#"
        SELECT {}
        FROM notifications
        WHERE user_id = $1 AND ($2 = FALSE OR is_read = FALSE)
        ORDER BY created_at DESC, id DESC
        LIMIT $3 OFFSET $4
        "#,
        COLUMNS
    ))
    .bind(user_id)
    .bind(unread_only)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Count all of a user's notifications
pub async fn count_notifications(pool: &PgPool, user_id: UserId) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

/// Count a user's unread notifications
pub async fn count_unread(pool: &PgPool, user_id: UserId) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Mark one notification read if it belongs to `user_id`
pub async fn mark_read(
    pool: &PgPool,
    id: NotificationId,
    user_id: UserId,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET is_read = TRUE, read_at = COALESCE(read_at, NOW())
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Mark all of a user's unread notifications read
pub async fn mark_all_read(pool: &PgPool, user_id: UserId) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET is_read = TRUE, read_at = NOW()
        WHERE user_id = $1 AND is_read = FALSE
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

use shared_types::{AppError, CreateNotificationRequest, Notification};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::engine::fanout::NotificationDraft;
use crate::error_convert::SqlxErrorExt;

const NOTIFICATION_COLUMNS: &str = "id, user_id, title, message, notification_type, read, \
    case_id, case_request_id, created_at";

/// Persist one planned notification row.
pub async fn create_from_draft(
    pool: &Pool<Postgres>,
    draft: &NotificationDraft,
) -> Result<Notification, AppError> {
    let row = sqlx::query_as::<_, Notification>(&format!(
        "INSERT INTO notifications
            (user_id, title, message, notification_type, case_id, case_request_id)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {NOTIFICATION_COLUMNS}"
    ))
    .bind(draft.user_id)
    .bind(&draft.title)
    .bind(&draft.message)
    .bind(draft.notification_type)
    .bind(draft.case_id)
    .bind(draft.case_request_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Trusted internal creation path (`POST /api/notifications`).
pub async fn create(
    pool: &Pool<Postgres>,
    req: &CreateNotificationRequest,
) -> Result<Notification, AppError> {
    let draft = NotificationDraft {
        user_id: req.user_id,
        title: req.title.clone(),
        message: req.message.clone(),
        notification_type: req.notification_type,
        case_id: req.case_id,
        case_request_id: req.case_request_id,
    };
    create_from_draft(pool, &draft).await
}

/// A recipient's notifications, newest first, capped at 50.
pub async fn list_for_user(
    pool: &Pool<Postgres>,
    user_id: i64,
) -> Result<Vec<Notification>, AppError> {
    let rows = sqlx::query_as::<_, Notification>(&format!(
        "SELECT {NOTIFICATION_COLUMNS} FROM notifications
         WHERE user_id = $1
         ORDER BY created_at DESC
         LIMIT 50"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

/// Mark one notification read. Scoped to the owner; marking an already-read
/// row again succeeds and changes nothing.
pub async fn mark_read(
    pool: &Pool<Postgres>,
    id: Uuid,
    user_id: i64,
) -> Result<Option<Notification>, AppError> {
    let row = sqlx::query_as::<_, Notification>(&format!(
        "UPDATE notifications SET read = TRUE
         WHERE id = $1 AND user_id = $2
         RETURNING {NOTIFICATION_COLUMNS}"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Mark all of a user's notifications read. Returns how many rows flipped.
pub async fn mark_all_read(pool: &Pool<Postgres>, user_id: i64) -> Result<u64, AppError> {
    let result = sqlx::query(
        "UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE",
    )
    .bind(user_id)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected())
}

/// Delete one notification, scoped to the owner. Returns true if a row went.
pub async fn delete(pool: &Pool<Postgres>, id: Uuid, user_id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}

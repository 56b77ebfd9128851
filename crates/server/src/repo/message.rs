use shared_types::{AppError, Message, SendMessageRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const MESSAGE_COLUMNS: &str =
    "id, seq, sender_id, receiver_id, case_id, content, read, created_at";

/// Append one message to a conversation.
pub async fn append(
    pool: &Pool<Postgres>,
    sender_id: i64,
    req: &SendMessageRequest,
) -> Result<Message, AppError> {
    let row = sqlx::query_as::<_, Message>(&format!(
        "INSERT INTO messages (sender_id, receiver_id, case_id, content)
         VALUES ($1, $2, $3, $4)
         RETURNING {MESSAGE_COLUMNS}"
    ))
    .bind(sender_id)
    .bind(req.receiver_id)
    .bind(req.case_id)
    .bind(&req.content)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// The conversation between two users, oldest first. Ties on `created_at`
/// break on the insertion-order `seq` column, keeping the order stable.
pub async fn list_conversation(
    pool: &Pool<Postgres>,
    user_a: i64,
    user_b: i64,
    case_id: Option<Uuid>,
) -> Result<Vec<Message>, AppError> {
    let rows = sqlx::query_as::<_, Message>(&format!(
        "SELECT {MESSAGE_COLUMNS} FROM messages
         WHERE ((sender_id = $1 AND receiver_id = $2)
             OR (sender_id = $2 AND receiver_id = $1))
           AND ($3::uuid IS NULL OR case_id = $3)
         ORDER BY created_at ASC, seq ASC"
    ))
    .bind(user_a)
    .bind(user_b)
    .bind(case_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Message>, AppError> {
    let row = sqlx::query_as::<_, Message>(&format!(
        "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Flip `read` to true. There is no unread action, so running this twice
/// is harmless.
pub async fn mark_read(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Message>, AppError> {
    let row = sqlx::query_as::<_, Message>(&format!(
        "UPDATE messages SET read = TRUE WHERE id = $1 RETURNING {MESSAGE_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

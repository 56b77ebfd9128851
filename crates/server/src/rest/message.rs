use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared_types::{AppError, MessageResponse, SendMessageRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::auth::extractors::AuthRequired;
use crate::engine::fanout::{self, TransitionEvent};
use crate::error_convert::ValidateRequest;

#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    pub case_id: Option<Uuid>,
}

/// POST /api/messages
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = MessageResponse),
        (status = 400, description = "Unknown receiver or self-send", body = AppError),
        (status = 422, description = "Empty content", body = AppError)
    ),
    security(("bearer" = [])),
    tag = "messages"
)]
pub async fn send_message(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    body.validate_request()?;

    if body.receiver_id == claims.sub {
        return Err(AppError::bad_request("Cannot send a message to yourself"));
    }
    crate::repo::user::find_by_id(&pool, body.receiver_id)
        .await?
        .ok_or_else(|| AppError::bad_request(format!("Unknown user {}", body.receiver_id)))?;

    let message = crate::repo::message::append(&pool, claims.sub, &body).await?;

    fanout::dispatch(&pool, &TransitionEvent::MessageSent(message.clone())).await;

    Ok((StatusCode::CREATED, Json(MessageResponse::from(message))))
}

/// GET /api/messages/{user_id}
///
/// The caller's conversation with one other user, oldest first, optionally
/// narrowed to one case via `?case_id=`.
#[utoipa::path(
    get,
    path = "/api/messages/{user_id}",
    params(
        ("user_id" = i64, Path, description = "The other participant"),
        ("case_id" = Option<Uuid>, Query, description = "Restrict to one case")
    ),
    responses(
        (status = 200, description = "Conversation messages", body = Vec<MessageResponse>)
    ),
    security(("bearer" = [])),
    tag = "messages"
)]
pub async fn get_conversation(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(user_id): Path<i64>,
    Query(query): Query<ConversationQuery>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let messages =
        crate::repo::message::list_conversation(&pool, claims.sub, user_id, query.case_id)
            .await?;

    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

/// PATCH /api/messages/{id}/read
#[utoipa::path(
    patch,
    path = "/api/messages/{id}/read",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message marked read", body = MessageResponse),
        (status = 403, description = "Only the receiver may mark read", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer" = [])),
    tag = "messages"
)]
pub async fn mark_message_read(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = crate::repo::message::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Message {id} not found")))?;

    if message.receiver_id != claims.sub {
        return Err(AppError::forbidden("Only the receiver may mark a message read"));
    }

    let message = crate::repo::message::mark_read(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Message {id} not found")))?;

    Ok(Json(MessageResponse::from(message)))
}

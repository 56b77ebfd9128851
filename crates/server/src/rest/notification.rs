use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use shared_types::{
    AckResponse, AppError, CreateNotificationRequest, NotificationResponse,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::auth::extractors::AuthRequired;
use crate::error_convert::ValidateRequest;

/// GET /api/notifications
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "The caller's notifications, newest first", body = Vec<NotificationResponse>)
    ),
    security(("bearer" = [])),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let rows = crate::repo::notification::list_for_user(&pool, claims.sub).await?;
    Ok(Json(rows.into_iter().map(NotificationResponse::from).collect()))
}

/// PATCH /api/notifications/{id}/read
#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked read", body = NotificationResponse),
        (status = 404, description = "Not found or not yours", body = AppError)
    ),
    security(("bearer" = [])),
    tag = "notifications"
)]
pub async fn mark_notification_read(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationResponse>, AppError> {
    let row = crate::repo::notification::mark_read(&pool, id, claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;

    Ok(Json(NotificationResponse::from(row)))
}

/// PATCH /api/notifications/mark-all-read
#[utoipa::path(
    patch,
    path = "/api/notifications/mark-all-read",
    responses(
        (status = 200, description = "All unread notifications marked read", body = AckResponse)
    ),
    security(("bearer" = [])),
    tag = "notifications"
)]
pub async fn mark_all_notifications_read(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<AckResponse>, AppError> {
    let flipped = crate::repo::notification::mark_all_read(&pool, claims.sub).await?;
    Ok(Json(AckResponse::new(format!(
        "Marked {flipped} notifications as read"
    ))))
}

/// DELETE /api/notifications/{id}
#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 204, description = "Notification deleted"),
        (status = 404, description = "Not found or not yours", body = AppError)
    ),
    security(("bearer" = [])),
    tag = "notifications"
)]
pub async fn delete_notification(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = crate::repo::notification::delete(&pool, id, claims.sub).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Notification {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/notifications
///
/// Internal path used by backoffice tooling; callers must present the
/// shared token from `INTERNAL_API_TOKEN`. Disabled when the variable is
/// not set.
#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = CreateNotificationRequest,
    responses(
        (status = 201, description = "Notification created", body = NotificationResponse),
        (status = 401, description = "Missing or wrong internal token", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "notifications"
)]
pub async fn create_notification(
    State(pool): State<Pool<Postgres>>,
    headers: HeaderMap,
    Json(body): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<NotificationResponse>), AppError> {
    require_internal_token(&headers)?;
    body.validate_request()?;

    crate::repo::user::find_by_id(&pool, body.user_id)
        .await?
        .ok_or_else(|| AppError::bad_request(format!("Unknown user {}", body.user_id)))?;

    let row = crate::repo::notification::create(&pool, &body).await?;
    Ok((StatusCode::CREATED, Json(NotificationResponse::from(row))))
}

fn require_internal_token(headers: &HeaderMap) -> Result<(), AppError> {
    let expected = std::env::var("INTERNAL_API_TOKEN")
        .map_err(|_| AppError::unauthorized("Internal notification creation is disabled"))?;

    let presented = headers
        .get("x-internal-token")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing internal token"))?;

    if presented != expected {
        return Err(AppError::unauthorized("Invalid internal token"));
    }
    Ok(())
}

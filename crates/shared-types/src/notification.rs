use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of notification categories fanned out by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "server",
    derive(sqlx::Type),
    sqlx(type_name = "notification_type", rename_all = "snake_case")
)]
pub enum NotificationType {
    CaseApproved,
    CaseRejected,
    HearingScheduled,
    NewMessage,
    CaseCreated,
    CaseRequest,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::CaseApproved => "case_approved",
            NotificationType::CaseRejected => "case_rejected",
            NotificationType::HearingScheduled => "hearing_scheduled",
            NotificationType::NewMessage => "new_message",
            NotificationType::CaseCreated => "case_created",
            NotificationType::CaseRequest => "case_request",
        }
    }
}

/// A persisted per-recipient notification row.
///
/// Created exactly once per triggering event; afterwards the only mutation
/// is marking it read, and only the owner may delete it. The `case_id` /
/// `case_request_id` backlinks are for UI linking only, never owning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: Uuid,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub read: bool,
    pub case_id: Option<Uuid>,
    pub case_request_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// API response shape for a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NotificationResponse {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_request_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            title: n.title,
            message: n.message,
            notification_type: n.notification_type,
            read: n.read,
            case_id: n.case_id,
            case_request_id: n.case_request_id,
            created_at: n.created_at,
        }
    }
}

/// Body for the trusted internal creation path (`POST /api/notifications`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct CreateNotificationRequest {
    pub user_id: i64,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Title is required"))
    )]
    pub title: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Message is required"))
    )]
    pub message: String,
    pub notification_type: NotificationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_request_id: Option<Uuid>,
}

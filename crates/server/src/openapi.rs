use axum::Router;
use shared_types::{
    AcceptCaseRequestRequest, AckResponse, AppError, AppErrorKind, ApproveCaseRequest,
    AuthResponse, CaseRequest, CaseResponse, CaseStatus, CreateCaseRequest,
    CreateCaseRequestRequest, CreateNotificationRequest, LoginRequest, MessageResponse,
    NotificationResponse, NotificationType, PoliceStation, RegisterRequest,
    RejectCaseRequest, RejectCaseRequestRequest, RequestStatus, Role, SendMessageRequest,
    UserResponse, VictimInfo, AccusedInfo,
};
use sqlx::{Pool, Postgres};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::db::AppState;
use crate::health;
use crate::rest;

/// OpenAPI documentation for the API.
#[derive(OpenApi)]
#[openapi(
    paths(
        // Accounts
        rest::auth::register,
        rest::auth::login,
        rest::auth::me,
        // Police stations
        rest::police_station::list_stations,
        // Case requests
        rest::case_request::create_case_request,
        rest::case_request::list_case_requests,
        rest::case_request::get_case_request,
        rest::case_request::accept_case_request,
        rest::case_request::reject_case_request,
        // Cases
        rest::case::create_case,
        rest::case::list_cases,
        rest::case::get_case,
        rest::case::submit_case,
        rest::case::review_case,
        rest::case::approve_case,
        rest::case::reject_case,
        // Notifications
        rest::notification::list_notifications,
        rest::notification::mark_notification_read,
        rest::notification::mark_all_notifications_read,
        rest::notification::delete_notification,
        rest::notification::create_notification,
        // Messages
        rest::message::send_message,
        rest::message::get_conversation,
        rest::message::mark_message_read,
        health::health_check,
    ),
    components(schemas(
        AppError, AppErrorKind, AckResponse, Role,
        UserResponse, RegisterRequest, LoginRequest, AuthResponse,
        PoliceStation,
        RequestStatus, CaseRequest, CreateCaseRequestRequest,
        AcceptCaseRequestRequest, RejectCaseRequestRequest,
        CaseStatus, CaseResponse, VictimInfo, AccusedInfo,
        CreateCaseRequest, ApproveCaseRequest, RejectCaseRequest,
        NotificationType, NotificationResponse, CreateNotificationRequest,
        MessageResponse, SendMessageRequest,
    )),
    tags(
        (name = "auth", description = "Account registration and login"),
        (name = "police-stations", description = "Police station directory"),
        (name = "case-requests", description = "Client-to-lawyer case requests"),
        (name = "cases", description = "Case lifecycle endpoints"),
        (name = "notifications", description = "Per-user notification feed"),
        (name = "messages", description = "Two-party messaging"),
        (name = "health", description = "Health check endpoint")
    ),
    info(
        title = "Nyaya API",
        description = "Legal case intake and tracking platform API",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build an Axum router that serves the API docs at `/docs`
/// and the REST API at `/api/*`.
pub fn api_router(pool: Pool<Postgres>) -> Router {
    let state = AppState { pool };

    Router::new()
        .merge(rest::api_router())
        .route("/health", axum::routing::get(health::health_check))
        .with_state(state)
        .route(
            "/api-docs/openapi.json",
            axum::routing::get(|| async { axum::Json(ApiDoc::openapi()) }),
        )
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
}

pub mod auth;
pub mod case;
pub mod case_request;
pub mod message;
pub mod notification;
pub mod police_station;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::db::AppState;

/// Build the combined REST API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Accounts
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        // Police stations
        .route("/api/police-stations", get(police_station::list_stations))
        // Case requests
        .route(
            "/api/case-requests",
            get(case_request::list_case_requests).post(case_request::create_case_request),
        )
        .route("/api/case-requests/{id}", get(case_request::get_case_request))
        .route(
            "/api/case-requests/{id}/accept",
            post(case_request::accept_case_request),
        )
        .route(
            "/api/case-requests/{id}/reject",
            post(case_request::reject_case_request),
        )
        // Cases
        .route("/api/cases", get(case::list_cases).post(case::create_case))
        .route("/api/cases/{id}", get(case::get_case))
        .route("/api/cases/{id}/submit", post(case::submit_case))
        .route("/api/cases/{id}/review", post(case::review_case))
        .route("/api/cases/{id}/approve", post(case::approve_case))
        .route("/api/cases/{id}/reject", post(case::reject_case))
        // Notifications
        .route(
            "/api/notifications",
            get(notification::list_notifications).post(notification::create_notification),
        )
        .route(
            "/api/notifications/mark-all-read",
            patch(notification::mark_all_notifications_read),
        )
        .route(
            "/api/notifications/{id}/read",
            patch(notification::mark_notification_read),
        )
        .route(
            "/api/notifications/{id}",
            delete(notification::delete_notification),
        )
        // Messages
        .route("/api/messages", post(message::send_message))
        .route("/api/messages/{user_id}", get(message::get_conversation))
        .route("/api/messages/{id}/read", patch(message::mark_message_read))
}

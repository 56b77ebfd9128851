use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Status ──────────────────────────────────────────────────────────

/// Lifecycle states of a case request. The only legal transitions are
/// pending → accepted and pending → rejected, each exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "server",
    derive(sqlx::Type),
    sqlx(type_name = "request_status", rename_all = "snake_case")
)]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DB row struct ───────────────────────────────────────────────────

/// A preliminary, lawyer-facing ask from a client, prior to a formal case
/// existing. Once resolved it is immutable except for `lawyer_response`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct CaseRequest {
    pub id: Uuid,
    pub client_id: i64,
    pub lawyer_id: i64,
    pub title: String,
    pub description: String,
    pub victim_name: String,
    pub accused_name: String,
    pub client_phone: String,
    pub client_email: Option<String>,
    pub documents: Vec<String>,
    pub status: RequestStatus,
    pub lawyer_response: Option<String>,
    // Detail fields, populated only at acceptance time.
    pub case_type: Option<String>,
    pub victim_phone: Option<String>,
    pub accused_phone: Option<String>,
    pub city: Option<String>,
    pub police_station_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ── Request types ───────────────────────────────────────────────────

/// Client-side creation of a request directed at one lawyer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct CreateCaseRequestRequest {
    pub lawyer_id: i64,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Title is required"))
    )]
    pub title: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Description is required"))
    )]
    pub description: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Victim name is required"))
    )]
    pub victim_name: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Accused name is required"))
    )]
    pub accused_name: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 5, message = "Contact phone is required"))
    )]
    pub client_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(default)]
    pub documents: Vec<String>,
}

/// Body for `POST /api/case-requests/{id}/accept`.
///
/// Detail fields flow into the case constructed from the request. When all
/// of `case_type`, `victim_phone`, `city`, and `police_station_id` are
/// present the case starts in `submitted`; otherwise it starts in `draft`
/// and the client completes it later.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AcceptCaseRequestRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lawyer_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub victim_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accused_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accused_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub police_station_id: Option<String>,
}

impl AcceptCaseRequestRequest {
    /// Whether every detail field needed for a submittable case is present.
    pub fn has_complete_details(&self) -> bool {
        self.case_type.is_some()
            && self.victim_phone.is_some()
            && self.city.is_some()
            && self.police_station_id.is_some()
    }
}

/// Body for `POST /api/case-requests/{id}/reject`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RejectCaseRequestRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lawyer_response: Option<String>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Status ──────────────────────────────────────────────────────────

/// Lifecycle states of a case. The transition engine is a total match over
/// this enum, so an out-of-range status cannot exist past deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "server",
    derive(sqlx::Type),
    sqlx(type_name = "case_status", rename_all = "snake_case")
)]
pub enum CaseStatus {
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Draft => "draft",
            CaseStatus::Submitted => "submitted",
            CaseStatus::UnderReview => "under_review",
            CaseStatus::Approved => "approved",
            CaseStatus::Rejected => "rejected",
        }
    }

    /// Terminal states never regress to an earlier state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CaseStatus::Approved | CaseStatus::Rejected)
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DB row struct ───────────────────────────────────────────────────

/// The authoritative case record.
///
/// Invariants enforced by the engine and registry: `pnr` and `hearing_date`
/// are set iff `status = approved`; status never regresses out of a
/// terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Case {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub case_type: String,
    pub victim_name: String,
    pub victim_phone: String,
    pub victim_email: Option<String>,
    pub accused_name: String,
    pub accused_phone: Option<String>,
    pub accused_address: Option<String>,
    pub client_id: i64,
    pub lawyer_id: Option<i64>,
    pub police_station_id: String,
    pub city: String,
    pub status: CaseStatus,
    /// Unique reference code assigned by the police reviewer on approval.
    pub pnr: Option<String>,
    pub hearing_date: Option<DateTime<Utc>>,
    /// Opaque document references, in upload order.
    pub documents: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── API response types ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VictimInfo {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AccusedInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// API response shape for a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub case_type: String,
    pub victim: VictimInfo,
    pub accused: AccusedInfo,
    pub client_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lawyer_id: Option<i64>,
    pub police_station_id: String,
    pub city: String,
    pub status: CaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pnr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hearing_date: Option<DateTime<Utc>>,
    pub documents: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Case> for CaseResponse {
    fn from(c: Case) -> Self {
        Self {
            id: c.id,
            title: c.title,
            description: c.description,
            case_type: c.case_type,
            victim: VictimInfo {
                name: c.victim_name,
                phone: c.victim_phone,
                email: c.victim_email,
            },
            accused: AccusedInfo {
                name: c.accused_name,
                phone: c.accused_phone,
                address: c.accused_address,
            },
            client_id: c.client_id,
            lawyer_id: c.lawyer_id,
            police_station_id: c.police_station_id,
            city: c.city,
            status: c.status,
            pnr: c.pnr,
            hearing_date: c.hearing_date,
            documents: c.documents,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

// ── Request types ───────────────────────────────────────────────────

/// Client-side creation of a draft case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct CreateCaseRequest {
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
        validate(length(min = 1, message = "Case type is required"))
    )]
    pub case_type: String,
    pub victim: VictimInfo,
    pub accused: AccusedInfo,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Police station is required"))
    )]
    pub police_station_id: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "City is required"))
    )]
    pub city: String,
    #[serde(default)]
    pub documents: Vec<String>,
}

/// Body for `POST /api/cases/{id}/approve`. Both fields are mandatory;
/// the handler fails with MissingField before touching storage otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApproveCaseRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pnr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hearing_date: Option<DateTime<Utc>>,
}

/// Body for `POST /api/cases/{id}/reject`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RejectCaseRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

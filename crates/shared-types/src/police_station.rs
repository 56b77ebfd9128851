use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered police station. The `id` is the station code referenced by
/// cases and police accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct PoliceStation {
    pub id: String,
    pub name: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
}

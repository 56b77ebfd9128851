use serde::{Deserialize, Serialize};

/// Closed set of platform roles. Carried in the JWT and on every `Actor`
/// passed into the transition engine — never read from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "server",
    derive(sqlx::Type),
    sqlx(type_name = "user_role", rename_all = "lowercase")
)]
pub enum Role {
    Client,
    Lawyer,
    Police,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Lawyer => "lawyer",
            Role::Police => "police",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "client" => Some(Role::Client),
            "lawyer" => Some(Role::Lawyer),
            "police" => Some(Role::Police),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated identity performing an action.
///
/// Built from JWT claims by the auth extractor; `police_station_id` is
/// present only for police accounts and scopes which cases they may review.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: i64,
    pub role: Role,
    pub police_station_id: Option<String>,
}

impl Actor {
    pub fn client(id: i64) -> Self {
        Self {
            id,
            role: Role::Client,
            police_station_id: None,
        }
    }

    pub fn lawyer(id: i64) -> Self {
        Self {
            id,
            role: Role::Lawyer,
            police_station_id: None,
        }
    }

    pub fn police(id: i64, station: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::Police,
            police_station_id: Some(station.into()),
        }
    }
}

/// Generic success envelope for endpoints that return no entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AckResponse {
    pub message: String,
}

impl AckResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use sqlx::{Pool, Postgres};

/// Health check response. `stations` doubles as a seed-data check: a zero
/// means the station directory migration has not run.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub db: String,
    pub stations: i64,
    pub version: String,
}

/// Health check handler.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(pool): State<Pool<Postgres>>) -> Json<HealthResponse> {
    let (db_status, stations) =
        match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM police_stations")
            .fetch_one(&pool)
            .await
        {
            Ok(count) => ("connected".to_string(), count),
            Err(e) => (format!("error: {e}"), 0),
        };

    Json(HealthResponse {
        status: "ok".to_string(),
        db: db_status,
        stations,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

use axum::{extract::State, Json};
use shared_types::{AppError, PoliceStation};
use sqlx::{Pool, Postgres};

/// GET /api/police-stations
#[utoipa::path(
    get,
    path = "/api/police-stations",
    responses(
        (status = 200, description = "All registered stations", body = Vec<PoliceStation>)
    ),
    tag = "police-stations"
)]
pub async fn list_stations(
    State(pool): State<Pool<Postgres>>,
) -> Result<Json<Vec<PoliceStation>>, AppError> {
    let stations = crate::repo::police_station::list(&pool).await?;
    Ok(Json(stations))
}

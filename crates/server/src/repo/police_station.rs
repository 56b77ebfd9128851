use shared_types::{AppError, PoliceStation};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

pub async fn list(pool: &Pool<Postgres>) -> Result<Vec<PoliceStation>, AppError> {
    let rows = sqlx::query_as::<_, PoliceStation>(
        "SELECT id, name, city, created_at FROM police_stations ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

pub async fn find_by_id(
    pool: &Pool<Postgres>,
    id: &str,
) -> Result<Option<PoliceStation>, AppError> {
    let row = sqlx::query_as::<_, PoliceStation>(
        "SELECT id, name, city, created_at FROM police_stations WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

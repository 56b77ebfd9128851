use shared_types::{AppError, RegisterRequest, User};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

const USER_COLUMNS: &str =
    "id, email, password_hash, full_name, phone, role, police_station_id, created_at";

/// Insert a new account with an already-hashed password.
pub async fn create(
    pool: &Pool<Postgres>,
    req: &RegisterRequest,
    password_hash: &str,
) -> Result<User, AppError> {
    let row = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, password_hash, full_name, phone, role, police_station_id)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&req.email)
    .bind(password_hash)
    .bind(&req.full_name)
    .bind(&req.phone)
    .bind(req.role)
    .bind(&req.police_station_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

pub async fn find_by_email(
    pool: &Pool<Postgres>,
    email: &str,
) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

use axum::{extract::State, http::StatusCode, Json};
use shared_types::{AppError, AuthResponse, LoginRequest, RegisterRequest, Role, UserResponse};
use sqlx::{Pool, Postgres};

use crate::auth::extractors::AuthRequired;
use crate::auth::{jwt, password};
use crate::error_convert::ValidateRequest;

/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 409, description = "Email already registered", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "auth"
)]
pub async fn register(
    State(pool): State<Pool<Postgres>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    body.validate_request()?;

    if body.role == Role::Police {
        let station = body
            .police_station_id
            .as_deref()
            .ok_or_else(|| AppError::missing_field("police_station_id is required for police accounts"))?;
        crate::repo::police_station::find_by_id(&pool, station)
            .await?
            .ok_or_else(|| AppError::bad_request(format!("Unknown police station {station}")))?;
    }

    let hash = password::hash_password(&body.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let user = crate::repo::user::create(&pool, &body, &hash).await?;
    let token = jwt::create_access_token(&user)
        .map_err(|e| AppError::internal(format!("Failed to issue token: {e}")))?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserResponse::from(user),
        }),
    ))
}

/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = AppError)
    ),
    tag = "auth"
)]
pub async fn login(
    State(pool): State<Pool<Postgres>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = crate::repo::user::find_by_email(&pool, &body.email)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    let valid = password::verify_password(&body.password, &user.password_hash)
        .unwrap_or(false);
    if !valid {
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    let token = jwt::create_access_token(&user)
        .map_err(|e| AppError::internal(format!("Failed to issue token: {e}")))?;

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<UserResponse>, AppError> {
    let user = crate::repo::user::find_by_id(&pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("Account no longer exists"))?;

    Ok(Json(UserResponse::from(user)))
}

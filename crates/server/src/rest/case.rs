use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared_types::{
    ApproveCaseRequest, AppError, Case, CaseResponse, CreateCaseRequest, RejectCaseRequest,
    Role,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::auth::extractors::AuthRequired;
use crate::engine::fanout::{self, TransitionEvent};
use crate::engine::{self, CaseAction};
use crate::error_convert::ValidateRequest;

/// POST /api/cases
#[utoipa::path(
    post,
    path = "/api/cases",
    request_body = CreateCaseRequest,
    responses(
        (status = 201, description = "Draft case created", body = CaseResponse),
        (status = 400, description = "Invalid request", body = AppError),
        (status = 403, description = "Not a client", body = AppError)
    ),
    security(("bearer" = [])),
    tag = "cases"
)]
pub async fn create_case(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Json(body): Json<CreateCaseRequest>,
) -> Result<(StatusCode, Json<CaseResponse>), AppError> {
    if claims.role != Role::Client {
        return Err(AppError::forbidden("Only clients may open cases"));
    }
    body.validate_request()?;

    crate::repo::police_station::find_by_id(&pool, &body.police_station_id)
        .await?
        .ok_or_else(|| {
            AppError::bad_request(format!("Unknown police station {}", body.police_station_id))
        })?;

    let case = crate::repo::case::create_draft(&pool, claims.sub, &body).await?;
    Ok((StatusCode::CREATED, Json(CaseResponse::from(case))))
}

/// GET /api/cases
#[utoipa::path(
    get,
    path = "/api/cases",
    responses(
        (status = 200, description = "Cases visible to the caller", body = Vec<CaseResponse>)
    ),
    security(("bearer" = [])),
    tag = "cases"
)]
pub async fn list_cases(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<Vec<CaseResponse>>, AppError> {
    let cases = crate::repo::case::list_for_actor(&pool, &claims.actor()).await?;
    Ok(Json(cases.into_iter().map(CaseResponse::from).collect()))
}

/// GET /api/cases/{id}
#[utoipa::path(
    get,
    path = "/api/cases/{id}",
    params(("id" = Uuid, Path, description = "Case ID")),
    responses(
        (status = 200, description = "The case", body = CaseResponse),
        (status = 404, description = "Not found or not yours", body = AppError)
    ),
    security(("bearer" = [])),
    tag = "cases"
)]
pub async fn get_case(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<Uuid>,
) -> Result<Json<CaseResponse>, AppError> {
    let case = find_visible_case(&pool, id, &claims).await?;
    Ok(Json(CaseResponse::from(case)))
}

/// POST /api/cases/{id}/submit
#[utoipa::path(
    post,
    path = "/api/cases/{id}/submit",
    params(("id" = Uuid, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Case submitted", body = CaseResponse),
        (status = 403, description = "Not the owning client", body = AppError),
        (status = 404, description = "Not found", body = AppError),
        (status = 409, description = "Not a draft", body = AppError)
    ),
    security(("bearer" = [])),
    tag = "cases"
)]
pub async fn submit_case(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<Uuid>,
) -> Result<Json<CaseResponse>, AppError> {
    let case = apply_transition(&pool, id, CaseAction::Submit, &claims).await?;
    Ok(Json(CaseResponse::from(case)))
}

/// POST /api/cases/{id}/review
#[utoipa::path(
    post,
    path = "/api/cases/{id}/review",
    params(("id" = Uuid, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Case taken under review", body = CaseResponse),
        (status = 403, description = "Not a reviewer at this station", body = AppError),
        (status = 404, description = "Not found", body = AppError),
        (status = 409, description = "Not submitted", body = AppError)
    ),
    security(("bearer" = [])),
    tag = "cases"
)]
pub async fn review_case(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<Uuid>,
) -> Result<Json<CaseResponse>, AppError> {
    let case = apply_transition(&pool, id, CaseAction::Review, &claims).await?;
    Ok(Json(CaseResponse::from(case)))
}

/// POST /api/cases/{id}/approve
#[utoipa::path(
    post,
    path = "/api/cases/{id}/approve",
    request_body = ApproveCaseRequest,
    params(("id" = Uuid, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Case approved", body = CaseResponse),
        (status = 403, description = "Not a reviewer at this station", body = AppError),
        (status = 404, description = "Not found", body = AppError),
        (status = 409, description = "Not under review", body = AppError),
        (status = 422, description = "pnr or hearing_date missing", body = AppError)
    ),
    security(("bearer" = [])),
    tag = "cases"
)]
pub async fn approve_case(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<Uuid>,
    Json(body): Json<ApproveCaseRequest>,
) -> Result<Json<CaseResponse>, AppError> {
    let action = CaseAction::Approve {
        pnr: body.pnr,
        hearing_date: body.hearing_date,
    };
    let case = apply_transition(&pool, id, action, &claims).await?;
    Ok(Json(CaseResponse::from(case)))
}

/// POST /api/cases/{id}/reject
#[utoipa::path(
    post,
    path = "/api/cases/{id}/reject",
    request_body = RejectCaseRequest,
    params(("id" = Uuid, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Case rejected", body = CaseResponse),
        (status = 403, description = "Not a reviewer at this station", body = AppError),
        (status = 404, description = "Not found", body = AppError),
        (status = 409, description = "Not rejectable from this state", body = AppError)
    ),
    security(("bearer" = [])),
    tag = "cases"
)]
pub async fn reject_case(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<Uuid>,
    Json(body): Json<RejectCaseRequest>,
) -> Result<Json<CaseResponse>, AppError> {
    let case = apply_transition_with_reason(&pool, id, CaseAction::Reject, &claims, body.reason)
        .await?;
    Ok(Json(CaseResponse::from(case)))
}

/// Validate, commit conditionally, then fan out. The shared shape of every
/// case status endpoint.
async fn apply_transition(
    pool: &Pool<Postgres>,
    id: Uuid,
    action: CaseAction,
    claims: &crate::auth::jwt::Claims,
) -> Result<Case, AppError> {
    apply_transition_with_reason(pool, id, action, claims, None).await
}

async fn apply_transition_with_reason(
    pool: &Pool<Postgres>,
    id: Uuid,
    action: CaseAction,
    claims: &crate::auth::jwt::Claims,
    reason: Option<String>,
) -> Result<Case, AppError> {
    let case = crate::repo::case::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Case {id} not found")))?;

    let new_status = engine::case_transition(&case, &action, &claims.actor())?;

    let (pnr, hearing_date) = match &action {
        CaseAction::Approve { pnr, hearing_date } => (pnr.as_deref(), *hearing_date),
        _ => (None, None),
    };

    // Conditional on the status we just validated against: a concurrent
    // transition in between makes this a zero-row update.
    let updated =
        crate::repo::case::update_status_if(pool, id, case.status, new_status, pnr, hearing_date)
            .await?
            .ok_or_else(|| {
                AppError::invalid_transition("Case state changed concurrently; reload and retry")
            })?;

    // State is committed; notification failures from here on are logged,
    // never surfaced.
    match &action {
        CaseAction::Approve { .. } => {
            fanout::dispatch(pool, &TransitionEvent::CaseApproved(updated.clone())).await;
        }
        CaseAction::Reject => {
            fanout::dispatch(
                pool,
                &TransitionEvent::CaseRejected {
                    case: updated.clone(),
                    reason,
                },
            )
            .await;
        }
        CaseAction::Submit | CaseAction::Review => {}
    }

    tracing::info!(case_id = %updated.id, status = %updated.status, "Case transition applied");
    Ok(updated)
}

/// Fetch a case if the caller is a party to it (owning client, assigned
/// lawyer, or reviewer at its station); anything else reads as not found.
async fn find_visible_case(
    pool: &Pool<Postgres>,
    id: Uuid,
    claims: &crate::auth::jwt::Claims,
) -> Result<Case, AppError> {
    let case = crate::repo::case::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Case {id} not found")))?;

    let visible = match claims.role {
        Role::Client => case.client_id == claims.sub,
        Role::Lawyer => case.lawyer_id == Some(claims.sub),
        Role::Police => {
            claims.police_station_id.as_deref() == Some(case.police_station_id.as_str())
        }
    };
    if !visible {
        return Err(AppError::not_found(format!("Case {id} not found")));
    }

    Ok(case)
}

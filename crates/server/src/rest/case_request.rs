use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared_types::{
    AcceptCaseRequestRequest, AppError, CaseRequest, CaseResponse, CreateCaseRequestRequest,
    RejectCaseRequestRequest, Role,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::auth::extractors::AuthRequired;
use crate::engine::fanout::{self, TransitionEvent};
use crate::engine::{self, RequestAction};
use crate::error_convert::ValidateRequest;

/// POST /api/case-requests
#[utoipa::path(
    post,
    path = "/api/case-requests",
    request_body = CreateCaseRequestRequest,
    responses(
        (status = 201, description = "Request created", body = CaseRequest),
        (status = 400, description = "Invalid request", body = AppError),
        (status = 403, description = "Not a client", body = AppError)
    ),
    security(("bearer" = [])),
    tag = "case-requests"
)]
pub async fn create_case_request(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Json(body): Json<CreateCaseRequestRequest>,
) -> Result<(StatusCode, Json<CaseRequest>), AppError> {
    if claims.role != Role::Client {
        return Err(AppError::forbidden("Only clients may send case requests"));
    }
    body.validate_request()?;

    let lawyer = crate::repo::user::find_by_id(&pool, body.lawyer_id)
        .await?
        .filter(|u| u.role == Role::Lawyer)
        .ok_or_else(|| AppError::bad_request("lawyer_id does not refer to a lawyer"))?;

    let request = crate::repo::case_request::create(&pool, claims.sub, &body).await?;

    fanout::dispatch(&pool, &TransitionEvent::CaseRequestCreated(request.clone())).await;
    tracing::info!(request_id = %request.id, lawyer_id = lawyer.id, "Case request created");

    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/case-requests
#[utoipa::path(
    get,
    path = "/api/case-requests",
    responses(
        (status = 200, description = "The caller's case requests", body = Vec<CaseRequest>),
        (status = 403, description = "Role has no case requests", body = AppError)
    ),
    security(("bearer" = [])),
    tag = "case-requests"
)]
pub async fn list_case_requests(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<Vec<CaseRequest>>, AppError> {
    let requests = match claims.role {
        Role::Client => crate::repo::case_request::list_by_client(&pool, claims.sub).await?,
        Role::Lawyer => crate::repo::case_request::list_by_lawyer(&pool, claims.sub).await?,
        Role::Police => {
            return Err(AppError::forbidden("Police accounts have no case requests"))
        }
    };

    Ok(Json(requests))
}

/// GET /api/case-requests/{id}
#[utoipa::path(
    get,
    path = "/api/case-requests/{id}",
    params(("id" = Uuid, Path, description = "Case request ID")),
    responses(
        (status = 200, description = "The case request", body = CaseRequest),
        (status = 404, description = "Not found or not yours", body = AppError)
    ),
    security(("bearer" = [])),
    tag = "case-requests"
)]
pub async fn get_case_request(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<Uuid>,
) -> Result<Json<CaseRequest>, AppError> {
    let request = crate::repo::case_request::find_by_id(&pool, id)
        .await?
        // Foreign rows look like missing rows.
        .filter(|r| r.client_id == claims.sub || r.lawyer_id == claims.sub)
        .ok_or_else(|| AppError::not_found(format!("Case request {id} not found")))?;

    Ok(Json(request))
}

/// POST /api/case-requests/{id}/accept
///
/// Compound transition: resolves the request and constructs its case in one
/// transaction, then fans out the case_created notification.
#[utoipa::path(
    post,
    path = "/api/case-requests/{id}/accept",
    request_body = AcceptCaseRequestRequest,
    params(("id" = Uuid, Path, description = "Case request ID")),
    responses(
        (status = 201, description = "Request accepted, case created", body = CaseResponse),
        (status = 403, description = "Not the addressed lawyer", body = AppError),
        (status = 404, description = "Not found", body = AppError),
        (status = 409, description = "Already resolved", body = AppError),
        (status = 422, description = "Missing detail fields", body = AppError)
    ),
    security(("bearer" = [])),
    tag = "case-requests"
)]
pub async fn accept_case_request(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<Uuid>,
    Json(body): Json<AcceptCaseRequestRequest>,
) -> Result<(StatusCode, Json<CaseResponse>), AppError> {
    let request = crate::repo::case_request::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Case request {id} not found")))?;

    let actor = claims.actor();
    engine::request_transition(&request, RequestAction::Accept, &actor)?;
    let new_case = engine::case_from_accepted_request(&request, &body)?;

    crate::repo::police_station::find_by_id(&pool, &new_case.police_station_id)
        .await?
        .ok_or_else(|| {
            AppError::bad_request(format!(
                "Unknown police station {}",
                new_case.police_station_id
            ))
        })?;

    let (request, case) =
        crate::repo::case_request::accept_and_create_case(&pool, id, &body, &new_case)
            .await?
            .ok_or_else(|| {
                AppError::invalid_transition("Case request was resolved concurrently")
            })?;

    fanout::dispatch(&pool, &TransitionEvent::CaseCreated(case.clone())).await;
    tracing::info!(
        request_id = %request.id,
        case_id = %case.id,
        status = %case.status,
        "Case request accepted"
    );

    Ok((StatusCode::CREATED, Json(CaseResponse::from(case))))
}

/// POST /api/case-requests/{id}/reject
#[utoipa::path(
    post,
    path = "/api/case-requests/{id}/reject",
    request_body = RejectCaseRequestRequest,
    params(("id" = Uuid, Path, description = "Case request ID")),
    responses(
        (status = 200, description = "Request rejected", body = CaseRequest),
        (status = 403, description = "Not the addressed lawyer", body = AppError),
        (status = 404, description = "Not found", body = AppError),
        (status = 409, description = "Already resolved", body = AppError)
    ),
    security(("bearer" = [])),
    tag = "case-requests"
)]
pub async fn reject_case_request(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<Uuid>,
    Json(body): Json<RejectCaseRequestRequest>,
) -> Result<Json<CaseRequest>, AppError> {
    let request = crate::repo::case_request::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Case request {id} not found")))?;

    engine::request_transition(&request, RequestAction::Reject, &claims.actor())?;

    let request = crate::repo::case_request::reject_if_pending(
        &pool,
        id,
        body.lawyer_response.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::invalid_transition("Case request was resolved concurrently"))?;

    Ok(Json(request))
}

use shared_types::{
    AcceptCaseRequestRequest, AppError, Case, CaseRequest, CreateCaseRequestRequest,
    RequestStatus,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::engine::NewCase;
use crate::error_convert::SqlxErrorExt;

const REQUEST_COLUMNS: &str = "id, client_id, lawyer_id, title, description, victim_name, \
    accused_name, client_phone, client_email, documents, status, lawyer_response, \
    case_type, victim_phone, accused_phone, city, police_station_id, created_at";

/// Insert a new pending request from a client to one lawyer.
pub async fn create(
    pool: &Pool<Postgres>,
    client_id: i64,
    req: &CreateCaseRequestRequest,
) -> Result<CaseRequest, AppError> {
    let row = sqlx::query_as::<_, CaseRequest>(&format!(
        "INSERT INTO case_requests
            (client_id, lawyer_id, title, description, victim_name, accused_name,
             client_phone, client_email, documents)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {REQUEST_COLUMNS}"
    ))
    .bind(client_id)
    .bind(req.lawyer_id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.victim_name)
    .bind(&req.accused_name)
    .bind(&req.client_phone)
    .bind(&req.client_email)
    .bind(&req.documents)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

pub async fn find_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<CaseRequest>, AppError> {
    let row = sqlx::query_as::<_, CaseRequest>(&format!(
        "SELECT {REQUEST_COLUMNS} FROM case_requests WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

pub async fn list_by_client(
    pool: &Pool<Postgres>,
    client_id: i64,
) -> Result<Vec<CaseRequest>, AppError> {
    let rows = sqlx::query_as::<_, CaseRequest>(&format!(
        "SELECT {REQUEST_COLUMNS} FROM case_requests
         WHERE client_id = $1 ORDER BY created_at DESC"
    ))
    .bind(client_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

pub async fn list_by_lawyer(
    pool: &Pool<Postgres>,
    lawyer_id: i64,
) -> Result<Vec<CaseRequest>, AppError> {
    let rows = sqlx::query_as::<_, CaseRequest>(&format!(
        "SELECT {REQUEST_COLUMNS} FROM case_requests
         WHERE lawyer_id = $1 ORDER BY created_at DESC"
    ))
    .bind(lawyer_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

/// Resolve a pending request to `accepted` or `rejected` exactly once.
///
/// The `status = 'pending'` guard makes the check-and-update one conditional
/// write: a concurrent second resolver matches zero rows and gets `None`,
/// which callers surface as `InvalidTransition`.
async fn resolve_on<'e, E>(
    executor: E,
    id: Uuid,
    new_status: RequestStatus,
    lawyer_response: Option<&str>,
    details: Option<&AcceptCaseRequestRequest>,
) -> Result<Option<CaseRequest>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "UPDATE case_requests SET
            status = $2,
            lawyer_response = $3,
            case_type = $4,
            victim_phone = $5,
            accused_phone = $6,
            city = $7,
            police_station_id = $8
         WHERE id = $1 AND status = 'pending'
         RETURNING {REQUEST_COLUMNS}"
    );
    sqlx::query_as::<_, CaseRequest>(&sql)
        .bind(id)
        .bind(new_status)
        .bind(lawyer_response)
        .bind(details.and_then(|d| d.case_type.as_deref()))
        .bind(details.and_then(|d| d.victim_phone.as_deref()))
        .bind(details.and_then(|d| d.accused_phone.as_deref()))
        .bind(details.and_then(|d| d.city.as_deref()))
        .bind(details.and_then(|d| d.police_station_id.as_deref()))
        .fetch_optional(executor)
        .await
}

/// Mark a pending request rejected, recording the optional lawyer response.
pub async fn reject_if_pending(
    pool: &Pool<Postgres>,
    id: Uuid,
    lawyer_response: Option<&str>,
) -> Result<Option<CaseRequest>, AppError> {
    resolve_on(pool, id, RequestStatus::Rejected, lawyer_response, None)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Accept a pending request and construct its case in one transaction.
///
/// Returns `None` when the request was no longer pending (a concurrent
/// resolver won); in that path the transaction is dropped and rolls back,
/// so no case row appears either.
pub async fn accept_and_create_case(
    pool: &Pool<Postgres>,
    id: Uuid,
    details: &AcceptCaseRequestRequest,
    new_case: &NewCase,
) -> Result<Option<(CaseRequest, Case)>, AppError> {
    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;

    let request = resolve_on(
        &mut *tx,
        id,
        RequestStatus::Accepted,
        details.lawyer_response.as_deref(),
        Some(details),
    )
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    let Some(request) = request else {
        return Ok(None);
    };

    let case = crate::repo::case::insert_from_request(&mut *tx, new_case)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;

    Ok(Some((request, case)))
}

use chrono::{DateTime, Utc};
use shared_types::{Actor, AppError, Case, CaseStatus, CreateCaseRequest, Role};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::engine::NewCase;
use crate::error_convert::SqlxErrorExt;

const CASE_COLUMNS: &str = "id, title, description, case_type, victim_name, victim_phone, \
    victim_email, accused_name, accused_phone, accused_address, client_id, lawyer_id, \
    police_station_id, city, status, pnr, hearing_date, documents, created_at, updated_at";

/// Insert a client-authored draft case.
pub async fn create_draft(
    pool: &Pool<Postgres>,
    client_id: i64,
    req: &CreateCaseRequest,
) -> Result<Case, AppError> {
    let row = sqlx::query_as::<_, Case>(&format!(
        "INSERT INTO cases
            (title, description, case_type, victim_name, victim_phone, victim_email,
             accused_name, accused_phone, accused_address, client_id, police_station_id,
             city, status, documents)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'draft', $13)
         RETURNING {CASE_COLUMNS}"
    ))
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.case_type)
    .bind(&req.victim.name)
    .bind(&req.victim.phone)
    .bind(&req.victim.email)
    .bind(&req.accused.name)
    .bind(&req.accused.phone)
    .bind(&req.accused.address)
    .bind(client_id)
    .bind(&req.police_station_id)
    .bind(&req.city)
    .bind(&req.documents)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Insert the case constructed from an accepted request. Runs on any
/// executor so the acceptance path can put it inside the same transaction
/// as the request resolution.
pub(crate) async fn insert_from_request<'e, E>(
    executor: E,
    new_case: &NewCase,
) -> Result<Case, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "INSERT INTO cases
            (title, description, case_type, victim_name, victim_phone, victim_email,
             accused_name, accused_phone, accused_address, client_id, lawyer_id,
             police_station_id, city, status, documents)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
         RETURNING {CASE_COLUMNS}"
    );
    sqlx::query_as::<_, Case>(&sql)
        .bind(&new_case.title)
        .bind(&new_case.description)
        .bind(&new_case.case_type)
        .bind(&new_case.victim_name)
        .bind(&new_case.victim_phone)
        .bind(&new_case.victim_email)
        .bind(&new_case.accused_name)
        .bind(&new_case.accused_phone)
        .bind(&new_case.accused_address)
        .bind(new_case.client_id)
        .bind(new_case.lawyer_id)
        .bind(&new_case.police_station_id)
        .bind(&new_case.city)
        .bind(new_case.status)
        .bind(&new_case.documents)
        .fetch_one(executor)
        .await
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Case>, AppError> {
    let row = sqlx::query_as::<_, Case>(&format!(
        "SELECT {CASE_COLUMNS} FROM cases WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// List the cases visible to an actor: clients and lawyers see their own,
/// police reviewers see their station's.
pub async fn list_for_actor(pool: &Pool<Postgres>, actor: &Actor) -> Result<Vec<Case>, AppError> {
    let query = match actor.role {
        Role::Client => format!(
            "SELECT {CASE_COLUMNS} FROM cases WHERE client_id = $1 ORDER BY created_at DESC"
        ),
        Role::Lawyer => format!(
            "SELECT {CASE_COLUMNS} FROM cases WHERE lawyer_id = $1 ORDER BY created_at DESC"
        ),
        Role::Police => format!(
            "SELECT {CASE_COLUMNS} FROM cases
             WHERE police_station_id = $1 AND status <> 'draft'
             ORDER BY created_at DESC"
        ),
    };

    let rows = match actor.role {
        Role::Police => {
            let station = actor
                .police_station_id
                .as_deref()
                .ok_or_else(|| AppError::forbidden("Police account has no station assigned"))?;
            sqlx::query_as::<_, Case>(&query).bind(station).fetch_all(pool)
        }
        _ => sqlx::query_as::<_, Case>(&query).bind(actor.id).fetch_all(pool),
    }
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

/// Commit a status transition with a conditional write.
///
/// The row is updated only while its stored status still equals `expected`,
/// so two racing transitions serialize: the loser matches zero rows and
/// gets `None`, which callers surface as `InvalidTransition`. `pnr` and
/// `hearing_date` are written together with the approval status, making the
/// commit atomic.
pub async fn update_status_if(
    pool: &Pool<Postgres>,
    id: Uuid,
    expected: CaseStatus,
    new_status: CaseStatus,
    pnr: Option<&str>,
    hearing_date: Option<DateTime<Utc>>,
) -> Result<Option<Case>, AppError> {
    let row = sqlx::query_as::<_, Case>(&format!(
        "UPDATE cases SET
            status = $3,
            pnr = $4,
            hearing_date = $5,
            updated_at = NOW()
         WHERE id = $1 AND status = $2
         RETURNING {CASE_COLUMNS}"
    ))
    .bind(id)
    .bind(expected)
    .bind(new_status)
    .bind(pnr)
    .bind(hearing_date)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

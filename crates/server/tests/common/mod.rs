use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware, Router,
};
use server::db::AppState;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::sync::OnceLock;
use tower::ServiceExt;

/// Tables to truncate before each test run (child tables before parents).
/// `police_stations` is seeded by migration and left alone.
const ALL_TABLES: &str = "messages, notifications, cases, case_requests, users";

/// One-time flag to ensure we only set up the test database once per process.
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Set up the test database and override DATABASE_URL so all subsequent pool
/// creation uses the `_test` database instead of the main one.
async fn ensure_test_db() {
    let _ = dotenvy::dotenv();
    if std::env::var("JWT_SECRET").is_err() {
        unsafe { std::env::set_var("JWT_SECRET", "integration-test-secret") };
    }
    let original_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let (base_url, db_name) = original_url
        .rsplit_once('/')
        .expect("DATABASE_URL must contain a database name");
    let test_db_name = format!("{}_test", db_name);
    let test_url = format!("{}/{}", base_url, test_db_name);

    let admin_url = format!("{}/postgres", base_url);
    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres admin database");

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&test_db_name)
            .fetch_one(&admin_pool)
            .await
            .expect("Failed to check for test database");

    if !exists {
        sqlx::query(&format!("CREATE DATABASE \"{}\"", test_db_name))
            .execute(&admin_pool)
            .await
            .expect("Failed to create test database");
    }

    admin_pool.close().await;

    unsafe { std::env::set_var("DATABASE_URL", &test_url) };
}

#[allow(dead_code)]
/// Build a pool connected to the test database.
/// On the first call, creates the database, runs migrations, and truncates all tables.
pub async fn test_pool() -> Pool<Postgres> {
    if INITIALIZED.get().is_none() {
        ensure_test_db().await;
    }

    let pool = server::db::create_pool();

    if INITIALIZED.set(()).is_ok() {
        server::db::run_migrations(&pool).await;

        sqlx::query(&format!("TRUNCATE {} CASCADE", ALL_TABLES))
            .execute(&pool)
            .await
            .expect("Failed to truncate test tables");
    }

    pool
}

#[allow(dead_code)]
/// Build a test router with auth middleware enabled, connected to the
/// dedicated test database.
pub async fn test_app() -> Router {
    let pool = test_pool().await;
    let state = AppState { pool };

    server::rest::api_router()
        .route("/health", axum::routing::get(server::health::health_check))
        .layer(middleware::from_fn(server::auth::middleware::auth_middleware))
        .with_state(state)
}

#[allow(dead_code)]
/// Register an account via the REST API and return its token and user id.
pub async fn register_user(
    app: &Router,
    email: &str,
    role: &str,
    police_station_id: Option<&str>,
) -> (String, i64) {
    let mut json = serde_json::json!({
        "email": email,
        "password": "correct-horse-battery",
        "full_name": format!("Test {role}"),
        "phone": "+91-99999-00000",
        "role": role,
    });
    if let Some(station) = police_station_id {
        json["police_station_id"] = serde_json::json!(station);
    }

    let (status, body) = post_json(app, "/api/auth/register", &json.to_string()).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    let token = parsed["token"].as_str().unwrap().to_string();
    let user_id = parsed["user"]["id"].as_i64().unwrap();
    (token, user_id)
}

#[allow(dead_code)]
/// Unique email per test run, so tests never collide on the unique index.
pub fn unique_email(prefix: &str) -> String {
    let ts = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}_{ts}@example.com")
}

async fn run(app: &Router, req: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[allow(dead_code)]
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    run(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

#[allow(dead_code)]
pub async fn get_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    run(
        app,
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

#[allow(dead_code)]
pub async fn post_json(app: &Router, uri: &str, json: &str) -> (StatusCode, String) {
    run(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
    )
    .await
}

#[allow(dead_code)]
pub async fn post_json_with_auth(
    app: &Router,
    uri: &str,
    json: &str,
    token: &str,
) -> (StatusCode, String) {
    run(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(json.to_string()))
            .unwrap(),
    )
    .await
}

#[allow(dead_code)]
pub async fn patch_json_with_auth(
    app: &Router,
    uri: &str,
    json: &str,
    token: &str,
) -> (StatusCode, String) {
    run(
        app,
        Request::builder()
            .method("PATCH")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(json.to_string()))
            .unwrap(),
    )
    .await
}

#[allow(dead_code)]
pub async fn delete_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    run(
        app,
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

use axum::middleware;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use server::{auth, config, db, openapi, telemetry};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    telemetry::init();
    config::load_feature_flags();

    let pool = db::create_pool();
    db::run_migrations(&pool).await;

    let app = openapi::api_router(pool)
        .layer(middleware::from_fn(auth::middleware::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!("Listening on {addr}");
    axum::serve(listener, app)
        .await
        .expect("Server error");
}

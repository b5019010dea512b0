pub mod db;
pub mod error;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Build the API router on top of the shared state.
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // User routes
        .route("/api/users/me", get(routes::users::me))
        // Patient routes
        .route("/api/patients", get(routes::patients::list))
        .route("/api/patients", post(routes::patients::create))
        .route("/api/patients/{id}", get(routes::patients::get_one))
        .route("/api/patients/{id}", put(routes::patients::update))
        .route("/api/patients/{id}", delete(routes::patients::remove))
        // Session routes
        .route(
            "/api/patients/{id}/sessions",
            get(routes::sessions::list_for_patient),
        )
        .route(
            "/api/patients/{id}/sessions",
            post(routes::sessions::create),
        )
        .route("/api/sessions/{id}", get(routes::sessions::detail))
        .route(
            "/api/sessions/{id}/comments",
            post(routes::sessions::add_comment),
        )
        .route("/api/sessions/{id}/result", get(routes::sessions::result))
        // Telemetry ingest
        .route("/api/results/{key}", put(routes::results::ingest))
        // Analytics
        .route(
            "/api/patients/{id}/metrics",
            get(routes::analytics::metrics),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/users/register", post(routes::users::register))
        .merge(protected_routes)
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Connect to database
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let state = AppState { db: Arc::new(db) };

    let app = build_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

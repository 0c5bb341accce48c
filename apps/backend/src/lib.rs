pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use study_core::{AnalyticsAggregator, DifficultyLadder, ReviewScheduler};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::services::sessions::SessionRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub sessions: Arc<SessionRegistry>,
    pub scheduler: Arc<dyn ReviewScheduler>,
    pub aggregator: AnalyticsAggregator,
}

impl AppState {
    pub fn new(db: Database, config: &Config) -> Self {
        Self {
            db: Arc::new(db),
            sessions: Arc::new(SessionRegistry::new(config.session_ttl())),
            scheduler: Arc::new(DifficultyLadder),
            aggregator: AnalyticsAggregator::new(config.analytics_offset()),
        }
    }
}

/// All routes, without the outer HTTP layers.
pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Flashcard routes
        .route("/api/flashcards/due", get(routes::flashcards::due))
        .route("/api/flashcards/:id/review", post(routes::flashcards::review))
        .route("/api/flashcards/:id/preview", get(routes::flashcards::preview))
        // Quiz session routes
        .route("/api/quiz-sessions", post(routes::quiz_sessions::start))
        .route("/api/quiz-sessions/:id", get(routes::quiz_sessions::show))
        .route("/api/quiz-sessions/:id/answer", post(routes::quiz_sessions::answer))
        .route("/api/quiz-sessions/:id/advance", post(routes::quiz_sessions::advance))
        // Statistics routes
        .route("/api/statistics", get(routes::statistics::overview))
        .route("/api/statistics/compute", post(routes::statistics::compute))
        .layer(middleware::from_fn(routes::auth::require_user));

    Router::new()
        .route("/health", get(health_check))
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

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url, config.db_max_connections).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let state = AppState::new(db, &config);
    tracing::info!(
        scheduler = state.scheduler.name(),
        utc_offset_minutes = config.utc_offset_minutes,
        "Engine configured"
    );

    let app = router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

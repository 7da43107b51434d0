use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use teamspace_api::api::{self, middleware::JwtSecret, AppState};
use teamspace_api::config::AppConfig;
use teamspace_api::infrastructure::events::TracingEventListener;
use teamspace_api::infrastructure::repositories::PostgresStore;
use teamspace_api::services::TeamService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database connected and migrated");

    let service = TeamService::new(PostgresStore::new(pool))
        .with_listener(Arc::new(TracingEventListener));
    let state = AppState::new(
        service,
        JwtSecret::new(config.jwt_secret.clone()),
        config.conflict_retry_attempts,
    );

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    tracing::info!("Server listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

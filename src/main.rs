use std::sync::{Arc, Mutex};

use anyhow::Context;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use garage_booking::config::AppConfig;
use garage_booking::db;
use garage_booking::handlers;
use garage_booking::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let cors = match &config.cors_origin {
        Some(origin) => {
            let value: HeaderValue = origin
                .parse()
                .with_context(|| format!("invalid CORS_ORIGIN: {origin}"))?;
            tracing::info!("allowing CORS from {origin}");
            CorsLayer::new()
                .allow_origin(value)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    };

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
    });

    let app = handlers::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::aggregator::Aggregator;
use crate::api::{self, AppState};
use crate::config::ClimaConfig;
use crate::geocoding::CityGeocoder;

/// Assemble the full application: `/api` routes plus static files for everything else
pub fn app(config: &ClimaConfig) -> Result<Router> {
    let aggregator = Aggregator::new(&config.upstream)?;
    let geocoder = CityGeocoder::new(
        aggregator.client().clone(),
        config.upstream.geocoding_url.clone(),
    );
    let state = AppState {
        aggregator: Arc::new(aggregator),
        geocoder: Arc::new(geocoder),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .nest("/api", api::router(state))
        .fallback_service(ServeDir::new(&config.server.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(api::panic_response))
        .layer(cors))
}

pub async fn run(config: ClimaConfig) -> Result<()> {
    let app = app(&config)?;

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server is running on port {}", config.server.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| "Server terminated unexpectedly")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

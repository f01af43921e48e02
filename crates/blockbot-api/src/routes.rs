//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression,
//! and all endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use blockbot_core::config::BlockbotConfig;
use blockbot_core::error::BlockbotError;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS: localhost origins on the configured port plus port+1 for a dev front-end.
    let port = state.config.general.port;
    let origins: Vec<HeaderValue> = [port, port.saturating_add(1)]
        .iter()
        .flat_map(|p| {
            [
                format!("http://127.0.0.1:{}", p),
                format!("http://localhost:{}", p),
            ]
        })
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let api_routes = Router::new()
        .route("/topics", get(handlers::topics))
        .route("/chat", post(handlers::chat))
        .route("/history", get(handlers::history))
        .route("/flows", get(handlers::flows))
        .route("/transfers", get(handlers::transfers));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured port.
///
/// Binds to 127.0.0.1 (localhost only).
pub async fn start_server(config: &BlockbotConfig, state: AppState) -> Result<(), BlockbotError> {
    let addr = format!("127.0.0.1:{}", config.general.port);

    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| BlockbotError::Api(format!("Failed to bind: {}", e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| BlockbotError::Api(format!("Server error: {}", e)))?;

    Ok(())
}

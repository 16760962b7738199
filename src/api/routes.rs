//! API Routes
//!
//! Configures the Axum router for the content server.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{content_handler, d20_handler, stats_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /d20` - Random roll between 1 and 20
/// - `GET /stats` - Cache statistics
/// - `GET /<path>` - Serve a file through the cache
/// - `POST /<path>` - Overwrite a file and mark its cached copy dirty
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/d20", get(d20_handler))
        .route("/stats", get(stats_handler))
        .fallback(content_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

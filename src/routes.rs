//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{short_id}`           - Short link redirect
//! - `GET  /health`               - Health check: event store, click queue
//! - `GET  /analytics/list`       - All click events
//! - `GET  /analytics/{short_id}` - Click events of one short id
//! - `POST /process-html`         - Rewrite anchors to short links
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/{short_id}", get(redirect_handler))
        .route("/health", get(health_handler))
        .merge(api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

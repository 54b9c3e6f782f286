//! API route configuration.

use crate::api::handlers::{
    analytics_by_short_id_handler, analytics_list_handler, process_html_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Analytics and link-processing routes.
///
/// # Endpoints
///
/// - `GET  /analytics/list`       - All click events
/// - `GET  /analytics/{short_id}` - Click events of one short id
/// - `POST /process-html`         - Rewrite anchors to short links
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/list", get(analytics_list_handler))
        .route("/analytics/{short_id}", get(analytics_by_short_id_handler))
        .route("/process-html", post(process_html_handler))
}

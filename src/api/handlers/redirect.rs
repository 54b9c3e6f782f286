//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::api::extractors::ClientMetadata;
use crate::application::services::{RedirectDecision, RedirectKind, Resolution};
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short id to its original URL.
///
/// # Endpoint
///
/// `GET /{short_id}`
///
/// # Request Flow
///
/// 1. Look up the short id in the registry
/// 2. Submit a click event to the queue (never awaited)
/// 3. Return 302 Found with `Location`
///
/// # Click Tracking
///
/// If the queue rejects the event the click is lost, logged, and the
/// redirect is still returned.
///
/// # Errors
///
/// Returns 404 with a plain-text body if the short id is unknown.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
    ClientMetadata(metadata): ClientMetadata,
) -> Response {
    match state.redirect_service.resolve(&short_id, metadata) {
        Resolution::Redirect(decision) => redirect_response(decision),
        Resolution::NotFound => (StatusCode::NOT_FOUND, "URL not found").into_response(),
    }
}

fn redirect_response(decision: RedirectDecision) -> Response {
    let status = match decision.kind {
        RedirectKind::Temporary => StatusCode::FOUND,
    };

    match HeaderValue::try_from(decision.location) {
        Ok(location) => (
            status,
            [
                (header::LOCATION, location),
                (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
            ],
        )
            .into_response(),
        Err(e) => {
            error!("Destination is not a valid Location header: {}", e);
            AppError::internal("Invalid destination URL", json!({})).into_response()
        }
    }
}

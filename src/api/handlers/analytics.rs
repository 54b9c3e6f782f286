//! Handlers for click event listing.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::clicks::ClickInfo;
use crate::error::AppError;
use crate::state::AppState;

/// Lists every recorded click in insertion order.
///
/// # Endpoint
///
/// `GET /analytics/list`
///
/// # Errors
///
/// Returns 503 if the event store is unreachable.
pub async fn analytics_list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClickInfo>>, AppError> {
    let events = state.analytics_service.list_all().await?;

    Ok(Json(events.into_iter().map(ClickInfo::from).collect()))
}

/// Lists clicks of one short id (exact match), in insertion order.
///
/// # Endpoint
///
/// `GET /analytics/{short_id}`
///
/// An unknown short id yields an empty array, not 404.
pub async fn analytics_by_short_id_handler(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
) -> Result<Json<Vec<ClickInfo>>, AppError> {
    let events = state.analytics_service.list_by_short_id(&short_id).await?;

    Ok(Json(events.into_iter().map(ClickInfo::from).collect()))
}

//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Event store**: Backend reachability (Redis PING, always ok in memory)
/// 2. **Click queue**: Accepting submissions with at least one consumer
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = check_event_store(&state).await;

    let queue_check = check_click_queue(&state);

    let all_healthy = store_check.status == "ok" && queue_check.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            event_store: store_check,
            click_queue: queue_check,
        },
        links: state.registry.len(),
        queue: state.queue.stats(),
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_event_store(state: &AppState) -> CheckStatus {
    if state.analytics_service.is_healthy().await {
        CheckStatus {
            status: "ok".to_string(),
            message: None,
        }
    } else {
        CheckStatus {
            status: "error".to_string(),
            message: Some("Event store unreachable".to_string()),
        }
    }
}

/// Checks if the click queue is accepting and being consumed.
fn check_click_queue(state: &AppState) -> CheckStatus {
    let queue = &state.queue;

    if !queue.is_accepting() {
        CheckStatus {
            status: "error".to_string(),
            message: Some("Click queue is closed".to_string()),
        }
    } else if queue.consumer_count() == 0 {
        CheckStatus {
            status: "error".to_string(),
            message: Some("No click queue consumers running".to_string()),
        }
    } else {
        CheckStatus {
            status: "ok".to_string(),
            message: Some(format!(
                "Capacity: {}/{}, consumers: {}",
                queue.available(),
                queue.capacity(),
                queue.consumer_count()
            )),
        }
    }
}

//! DTOs for click event data.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::ClickEvent;

/// Individual click event as returned by the analytics endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickInfo {
    pub short_id: String,
    pub timestamp: DateTime<Utc>,
    pub user_agent: String,
    pub client_address: String,
}

impl From<ClickEvent> for ClickInfo {
    fn from(event: ClickEvent) -> Self {
        Self {
            short_id: event.short_id,
            timestamp: event.timestamp,
            user_agent: event.user_agent,
            client_address: event.client_address,
        }
    }
}

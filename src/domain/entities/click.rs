//! Click event entity recorded for every successful redirect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User agent recorded when the request carries no `User-Agent` header.
pub const UNKNOWN_USER_AGENT: &str = "unknown";

/// A single redirect of a short link.
///
/// The timestamp is assigned by the producer at resolution time, so queue delay
/// never shifts it. `short_id` is not required to still exist in the registry
/// when the event is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub short_id: String,
    pub timestamp: DateTime<Utc>,
    pub user_agent: String,
    pub client_address: String,
}

impl ClickEvent {
    /// Creates an event stamped with the current time.
    pub fn new(short_id: impl Into<String>, metadata: RequestMetadata) -> Self {
        Self::at(short_id, Utc::now(), metadata)
    }

    /// Creates an event with an explicit timestamp.
    pub fn at(
        short_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        metadata: RequestMetadata,
    ) -> Self {
        Self {
            short_id: short_id.into(),
            timestamp,
            user_agent: metadata
                .user_agent
                .unwrap_or_else(|| UNKNOWN_USER_AGENT.to_string()),
            client_address: metadata.client_address.unwrap_or_default(),
        }
    }
}

/// Request-derived inputs of a [`ClickEvent`].
///
/// All fields are optional to handle missing headers gracefully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMetadata {
    pub user_agent: Option<String>,
    pub client_address: Option<String>,
}

impl RequestMetadata {
    pub fn new(user_agent: Option<&str>, client_address: Option<String>) -> Self {
        Self {
            user_agent: user_agent.map(|s| s.to_string()),
            client_address,
        }
    }
}

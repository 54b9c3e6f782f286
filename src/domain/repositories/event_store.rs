//! Repository trait for the append-only click event log.

use crate::domain::entities::ClickEvent;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by event store backends.
///
/// An append error never reaches the redirect path: the event queue treats it
/// as a transient consumer failure and retries the job.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("event store backend error: {0}")]
    Backend(String),

    #[error("event serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Append-only, queryable collection of click events.
///
/// Duplicate events are accepted: the queue delivers at least once.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::InMemoryEventStore`] - process-lifetime store
/// - [`crate::infrastructure::persistence::RedisEventStore`] - Redis list backend
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends one event to the end of the log.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the backend is unavailable.
    async fn append(&self, event: ClickEvent) -> Result<(), StoreError>;

    /// Returns every event in insertion order.
    async fn list_all(&self) -> Result<Vec<ClickEvent>, StoreError>;

    /// Returns events whose `short_id` equals `short_id` exactly (case-sensitive),
    /// in insertion order.
    async fn list_by_short_id(&self, short_id: &str) -> Result<Vec<ClickEvent>, StoreError>;

    /// Checks if the backend is reachable.
    async fn health_check(&self) -> bool;
}

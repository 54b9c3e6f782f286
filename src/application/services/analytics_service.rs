//! Read-only access to recorded click events.

use std::sync::Arc;

use crate::domain::entities::ClickEvent;
use crate::domain::repositories::EventStore;
use crate::error::AppError;

/// Lists click events from the [`EventStore`].
///
/// No aggregation: events come back exactly as stored, in insertion order.
pub struct AnalyticsService {
    store: Arc<dyn EventStore>,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    pub async fn list_all(&self) -> Result<Vec<ClickEvent>, AppError> {
        Ok(self.store.list_all().await?)
    }

    /// Events for one short id (exact, case-sensitive match).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    pub async fn list_by_short_id(&self, short_id: &str) -> Result<Vec<ClickEvent>, AppError> {
        Ok(self.store.list_by_short_id(short_id).await?)
    }

    pub async fn is_healthy(&self) -> bool {
        self.store.health_check().await
    }
}

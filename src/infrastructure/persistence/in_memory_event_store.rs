//! Process-lifetime event store.

use crate::domain::entities::ClickEvent;
use crate::domain::repositories::{EventStore, StoreError};
use async_trait::async_trait;
use parking_lot::RwLock;

/// Append-only event log held in memory.
///
/// Appends take a short write lock; reads clone a snapshot so listing never
/// holds the lock while serializing a response.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<ClickEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(&self, event: ClickEvent) -> Result<(), StoreError> {
        self.events.write().push(event);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ClickEvent>, StoreError> {
        Ok(self.events.read().clone())
    }

    async fn list_by_short_id(&self, short_id: &str) -> Result<Vec<ClickEvent>, StoreError> {
        Ok(self
            .events
            .read()
            .iter()
            .filter(|event| event.short_id == short_id)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

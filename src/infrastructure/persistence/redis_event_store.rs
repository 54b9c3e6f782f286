//! Redis-backed event store.

use crate::domain::entities::ClickEvent;
use crate::domain::repositories::{EventStore, StoreError};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{error, info, warn};

/// Stores click events as JSON entries of a single Redis list.
///
/// `RPUSH` keeps insertion order; reads fetch the whole list with `LRANGE`.
/// Connection failures are returned as [`StoreError::Backend`] so the queue
/// can retry the append.
pub struct RedisEventStore {
    client: ConnectionManager,
    key: String,
}

impl RedisEventStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        info!("Connecting to Redis at {}", redis_url);

        let client = Client::open(redis_url)
            .map_err(|e| StoreError::Backend(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Backend(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            key: "clicks:events".to_string(),
        })
    }

    async fn load(&self) -> Result<Vec<ClickEvent>, StoreError> {
        let mut conn = self.client.clone();
        let raw: Vec<String> = conn.lrange(&self.key, 0, -1).await.map_err(|e| {
            error!("Redis LRANGE error for {}: {}", self.key, e);
            StoreError::Backend(e.to_string())
        })?;

        Ok(decode_entries(&self.key, &raw))
    }
}

/// Decodes list entries, skipping any that are not a valid event.
fn decode_entries(key: &str, raw: &[String]) -> Vec<ClickEvent> {
    raw.iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_str(entry) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(key, index, "Skipping undecodable click event: {}", e);
                None
            }
        })
        .collect()
}

#[async_trait]
impl EventStore for RedisEventStore {
    async fn append(&self, event: ClickEvent) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&event)?;
        let mut conn = self.client.clone();

        let _len: i64 = conn
            .rpush(&self.key, payload)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ClickEvent>, StoreError> {
        self.load().await
    }

    async fn list_by_short_id(&self, short_id: &str) -> Result<Vec<ClickEvent>, StoreError> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|event| event.short_id == short_id)
            .collect())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}

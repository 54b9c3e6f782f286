//! Event store backends.
//!
//! - [`InMemoryEventStore`] - default, process-lifetime storage
//! - [`RedisEventStore`] - Redis list, used when `REDIS_URL` is configured

mod in_memory_event_store;
mod redis_event_store;

pub use in_memory_event_store::InMemoryEventStore;
pub use redis_event_store::RedisEventStore;

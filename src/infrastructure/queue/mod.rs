//! Click event queue decoupling redirects from event persistence.
//!
//! - [`EventQueue`] - bounded channel plus consumer pool
//! - [`QueueJob`] / [`JobState`] - per-job delivery state machine
//! - [`RetryPolicy`] - capped linear backoff

mod event_queue;
mod job;
mod retry_policy;

pub use event_queue::{EventQueue, QueueConfig, QueueError, QueueStats};
pub use job::{JobId, JobState, QueueJob, RetryDecision};
pub use retry_policy::RetryPolicy;

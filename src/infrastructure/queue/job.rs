//! Queue job wrapping a click event and its delivery state.

use super::retry_policy::RetryPolicy;
use crate::domain::entities::ClickEvent;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Identifier assigned to a job on submission.
pub type JobId = u64;

/// Delivery state of a [`QueueJob`].
///
/// `Pending -> Processing -> Committed | Failed(attempt)`; `Failed` goes back to
/// `Pending` after the backoff delay or ends in `DeadLettered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Processing,
    Committed,
    Failed { attempt: u32 },
    DeadLettered,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed | Self::DeadLettered)
    }
}

/// Outcome of a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter(Duration),
    DeadLetter,
}

/// A click event owned by the queue until it is persisted or dead-lettered.
#[derive(Debug, Clone)]
pub struct QueueJob {
    pub id: JobId,
    pub event: ClickEvent,
    /// Failed attempts so far.
    pub attempts: u32,
    pub enqueued_at: DateTime<Utc>,
    state: JobState,
}

impl QueueJob {
    pub fn new(id: JobId, event: ClickEvent) -> Self {
        Self {
            id,
            event,
            attempts: 0,
            enqueued_at: Utc::now(),
            state: JobState::Pending,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Marks the job as handed to a consumer.
    pub fn start(&mut self) {
        debug_assert_eq!(self.state, JobState::Pending);
        self.state = JobState::Processing;
    }

    /// Marks the job as persisted.
    pub fn commit(&mut self) {
        debug_assert_eq!(self.state, JobState::Processing);
        self.state = JobState::Committed;
    }

    /// Records a failed attempt and decides whether to retry.
    pub fn fail(&mut self, policy: &RetryPolicy) -> RetryDecision {
        debug_assert_eq!(self.state, JobState::Processing);
        self.attempts = self.attempts.saturating_add(1);

        if policy.allows(self.attempts) {
            self.state = JobState::Failed {
                attempt: self.attempts,
            };
            RetryDecision::RetryAfter(policy.delay(self.attempts))
        } else {
            self.state = JobState::DeadLettered;
            RetryDecision::DeadLetter
        }
    }

    /// Returns a failed job to the pending state once its delay elapsed.
    pub fn requeue(&mut self) {
        debug_assert!(matches!(self.state, JobState::Failed { .. }));
        self.state = JobState::Pending;
    }
}

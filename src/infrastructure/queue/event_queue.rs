//! At-least-once click event queue with a background consumer pool.

use super::job::{JobId, QueueJob, RetryDecision};
use super::retry_policy::RetryPolicy;
use crate::domain::entities::ClickEvent;
use crate::domain::repositories::EventStore;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Submission failures. The redirect path logs them and carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("click queue is full")]
    Full,

    #[error("click queue is closed")]
    Closed,
}

/// Queue sizing and retry settings.
#[derive(Debug, Clone, Copy)]
pub struct QueueConfig {
    pub capacity: usize,
    pub consumers: usize,
    pub retry: RetryPolicy,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            consumers: 4,
            retry: RetryPolicy::default(),
        }
    }
}

/// Point-in-time counters of the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub submitted: u64,
    pub committed: u64,
    pub retried: u64,
    pub dead_lettered: u64,
    pub rejected: u64,
    /// Accepted jobs that have not reached a terminal state.
    pub in_flight: usize,
}

#[derive(Default)]
struct Counters {
    submitted: AtomicU64,
    committed: AtomicU64,
    retried: AtomicU64,
    dead_lettered: AtomicU64,
    rejected: AtomicU64,
}

struct QueueInner {
    sender: mpsc::Sender<QueueJob>,
    receiver: Mutex<mpsc::Receiver<QueueJob>>,
    store: Arc<dyn EventStore>,
    policy: RetryPolicy,
    accepting: AtomicBool,
    next_id: AtomicU64,
    in_flight: watch::Sender<usize>,
    shutdown: watch::Sender<bool>,
    counters: Counters,
}

/// Bounded producer/consumer channel delivering click events to an [`EventStore`].
///
/// - [`submit`](Self::submit) never waits on consumers: it either enqueues or
///   fails fast with [`QueueError`].
/// - Consumer loops share one receiver, so a job is held by at most one
///   consumer at a time.
/// - A failed append is retried after [`RetryPolicy::delay`]; once the budget is
///   spent the job is dead-lettered, logged and counted.
///
/// Jobs are counted as in flight from submission until they are committed or
/// dead-lettered; [`drain`](Self::drain) waits for that count to reach zero.
pub struct EventQueue {
    inner: Arc<QueueInner>,
    capacity: usize,
    workers: parking_lot::Mutex<Vec<JoinHandle<()>>>,
}

impl EventQueue {
    /// Creates a queue without consumers.
    ///
    /// Jobs accumulate until [`spawn_consumers`](Self::spawn_consumers) is called.
    pub fn new(store: Arc<dyn EventStore>, config: QueueConfig) -> Self {
        let capacity = config.capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        let (in_flight, _) = watch::channel(0);
        let (shutdown, _) = watch::channel(false);

        Self {
            inner: Arc::new(QueueInner {
                sender,
                receiver: Mutex::new(receiver),
                store,
                policy: config.retry,
                accepting: AtomicBool::new(true),
                next_id: AtomicU64::new(1),
                in_flight,
                shutdown,
                counters: Counters::default(),
            }),
            capacity,
            workers: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Creates a queue and starts `config.consumers` consumer loops.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(store: Arc<dyn EventStore>, config: QueueConfig) -> Self {
        let queue = Self::new(store, config);
        queue.spawn_consumers(config.consumers.max(1));
        queue
    }

    /// Starts `count` additional consumer loops.
    pub fn spawn_consumers(&self, count: usize) {
        let mut workers = self.workers.lock();
        let offset = workers.len();

        for n in 0..count {
            let worker = offset + n;
            workers.push(tokio::spawn(run_consumer(self.inner.clone(), worker)));
        }

        info!("Click queue consumers running: {}", workers.len());
    }

    /// Enqueues a click event without waiting for it to be processed.
    ///
    /// # Errors
    ///
    /// - [`QueueError::Full`] if the channel is at capacity
    /// - [`QueueError::Closed`] after [`shutdown`](Self::shutdown) has begun
    pub fn submit(&self, event: ClickEvent) -> Result<JobId, QueueError> {
        let inner = &self.inner;

        // Counted before the accepting check so a concurrent drain cannot miss it.
        inner.in_flight.send_modify(|n| *n += 1);

        if !inner.accepting.load(Ordering::SeqCst) {
            inner.finish();
            inner.reject();
            return Err(QueueError::Closed);
        }

        let id = inner.next_id.fetch_add(1, Ordering::Relaxed);
        match inner.sender.try_send(QueueJob::new(id, event)) {
            Ok(()) => {
                inner.counters.submitted.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("click_queue_submitted_total").increment(1);
                Ok(id)
            }
            Err(e) => {
                inner.finish();
                inner.reject();
                Err(match e {
                    mpsc::error::TrySendError::Full(_) => QueueError::Full,
                    mpsc::error::TrySendError::Closed(_) => QueueError::Closed,
                })
            }
        }
    }

    /// Waits until every accepted job is committed or dead-lettered.
    ///
    /// Returns immediately when nothing is in flight. Never completes while
    /// jobs are pending and no consumer is running.
    pub async fn drain(&self) {
        let mut rx = self.inner.in_flight.subscribe();
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    /// Stops accepting submissions, drains in-flight jobs, then stops consumers.
    pub async fn shutdown(&self) {
        info!("Click queue shutting down");
        self.inner.accepting.store(false, Ordering::SeqCst);

        self.drain().await;
        self.inner.shutdown.send_replace(true);

        let workers = std::mem::take(&mut *self.workers.lock());
        for worker in workers {
            if let Err(e) = worker.await {
                error!("Click queue consumer panicked: {}", e);
            }
        }

        let stats = self.stats();
        info!(
            committed = stats.committed,
            dead_lettered = stats.dead_lettered,
            rejected = stats.rejected,
            "Click queue stopped"
        );
    }

    pub fn is_accepting(&self) -> bool {
        self.inner.accepting.load(Ordering::SeqCst)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots in the channel.
    pub fn available(&self) -> usize {
        self.inner.sender.capacity()
    }

    pub fn consumer_count(&self) -> usize {
        self.workers.lock().len()
    }

    pub fn stats(&self) -> QueueStats {
        let c = &self.inner.counters;
        QueueStats {
            submitted: c.submitted.load(Ordering::Relaxed),
            committed: c.committed.load(Ordering::Relaxed),
            retried: c.retried.load(Ordering::Relaxed),
            dead_lettered: c.dead_lettered.load(Ordering::Relaxed),
            rejected: c.rejected.load(Ordering::Relaxed),
            in_flight: *self.inner.in_flight.borrow(),
        }
    }
}

impl QueueInner {
    async fn next_job(&self) -> Option<QueueJob> {
        self.receiver.lock().await.recv().await
    }

    async fn process(self: &Arc<Self>, mut job: QueueJob, worker: usize) {
        job.start();

        match self.store.append(job.event.clone()).await {
            Ok(()) => {
                job.commit();
                self.counters.committed.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("click_queue_committed_total").increment(1);
                debug!(
                    worker,
                    job_id = job.id,
                    short_id = %job.event.short_id,
                    attempts = job.attempts,
                    "Click event committed"
                );
                self.finish();
            }
            Err(e) => match job.fail(&self.policy) {
                RetryDecision::RetryAfter(delay) => {
                    self.counters.retried.fetch_add(1, Ordering::Relaxed);
                    metrics::counter!("click_queue_retried_total").increment(1);
                    warn!(
                        worker,
                        job_id = job.id,
                        attempt = job.attempts,
                        delay_ms = millis(delay),
                        "Failed to persist click event, retrying: {}",
                        e
                    );
                    self.schedule_retry(job, delay);
                }
                RetryDecision::DeadLetter => self.dead_letter(&job, &e.to_string()),
            },
        }
    }

    fn schedule_retry(self: &Arc<Self>, mut job: QueueJob, delay: std::time::Duration) {
        let inner = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            job.requeue();
            // Waits for capacity rather than dropping an accepted job. The
            // receiver lives in `inner`, which this task holds, so the channel
            // is still open.
            let _ = inner.sender.send(job).await;
        });
    }

    fn dead_letter(&self, job: &QueueJob, reason: &str) {
        self.counters.dead_lettered.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("click_queue_dead_lettered_total").increment(1);
        error!(
            job_id = job.id,
            short_id = %job.event.short_id,
            timestamp = %job.event.timestamp,
            user_agent = %job.event.user_agent,
            client_address = %job.event.client_address,
            attempts = job.attempts,
            "Click event dead-lettered: {}",
            reason
        );
        self.finish();
    }

    fn reject(&self) {
        self.counters.rejected.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("click_queue_rejected_total").increment(1);
    }

    /// Marks one job as terminal.
    fn finish(&self) {
        self.in_flight.send_modify(|n| *n = n.saturating_sub(1));
    }
}

fn millis(delay: std::time::Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

async fn run_consumer(inner: Arc<QueueInner>, worker: usize) {
    let mut shutdown = inner.shutdown.subscribe();
    debug!(worker, "Click queue consumer started");

    loop {
        if *shutdown.borrow_and_update() {
            break;
        }

        let job = tokio::select! {
            biased;
            _ = shutdown.changed() => continue,
            job = inner.next_job() => job,
        };

        match job {
            Some(job) => inner.process(job, worker).await,
            None => break,
        }
    }

    debug!(worker, "Click queue consumer stopped");
}

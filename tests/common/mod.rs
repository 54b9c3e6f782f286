#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum::{Router, routing::get};
use parking_lot::Mutex;
use shortlink_tracker::api::handlers::{health_handler, redirect_handler};
use shortlink_tracker::api::routes::api_routes;
use shortlink_tracker::domain::entities::ClickEvent;
use shortlink_tracker::domain::repositories::{EventStore, StoreError};
use shortlink_tracker::infrastructure::persistence::InMemoryEventStore;
use shortlink_tracker::infrastructure::queue::{EventQueue, QueueConfig, RetryPolicy};
use shortlink_tracker::infrastructure::registry::UrlRegistry;
use shortlink_tracker::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tower::Layer;
use url::Url;

pub const BASE_URL: &str = "http://localhost:3000/";

/// Queue settings with millisecond backoff so retries finish quickly.
pub fn fast_queue_config(consumers: usize) -> QueueConfig {
    QueueConfig {
        capacity: 10_000,
        consumers,
        retry: RetryPolicy::new(Duration::from_millis(2), Duration::from_millis(10), 5),
    }
}

pub struct TestContext {
    pub state: AppState,
    pub registry: Arc<UrlRegistry>,
    pub store: Arc<InMemoryEventStore>,
    pub queue: Arc<EventQueue>,
}

pub fn create_test_context() -> TestContext {
    let registry = Arc::new(UrlRegistry::new());
    let store = Arc::new(InMemoryEventStore::new());
    let queue = Arc::new(EventQueue::start(store.clone(), fast_queue_config(4)));

    let state = AppState::new(
        registry.clone(),
        store.clone(),
        queue.clone(),
        Url::parse(BASE_URL).unwrap(),
    );

    TestContext {
        state,
        registry,
        store,
        queue,
    }
}

/// All routes without path normalization, ready for `TestServer` or `oneshot`.
pub fn create_test_router(state: AppState) -> Router {
    Router::new()
        .route("/{short_id}", get(redirect_handler))
        .route("/health", get(health_handler))
        .merge(api_routes())
        .with_state(state)
}

/// Inserts a fixed peer address, as `into_make_service_with_connect_info` would.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Event store whose first `failures` appends fail.
///
/// Records the (possibly paused) Tokio clock at every append attempt.
pub struct FlakyStore {
    failures: usize,
    calls: AtomicUsize,
    attempts: Mutex<Vec<tokio::time::Instant>>,
    inner: InMemoryEventStore,
}

impl FlakyStore {
    pub fn new(failures: usize) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
            attempts: Mutex::new(Vec::new()),
            inner: InMemoryEventStore::new(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Time between consecutive append attempts.
    pub fn gaps(&self) -> Vec<Duration> {
        self.attempts
            .lock()
            .windows(2)
            .map(|w| w[1].duration_since(w[0]))
            .collect()
    }

    pub fn committed(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl EventStore for FlakyStore {
    async fn append(&self, event: ClickEvent) -> Result<(), StoreError> {
        self.attempts.lock().push(tokio::time::Instant::now());

        if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
            return Err(StoreError::Backend("connection refused".to_string()));
        }

        self.inner.append(event).await
    }

    async fn list_all(&self) -> Result<Vec<ClickEvent>, StoreError> {
        self.inner.list_all().await
    }

    async fn list_by_short_id(&self, short_id: &str) -> Result<Vec<ClickEvent>, StoreError> {
        self.inner.list_by_short_id(short_id).await
    }

    async fn health_check(&self) -> bool {
        true
    }
}

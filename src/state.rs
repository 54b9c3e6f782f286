//! Shared application state injected into handlers.

use std::sync::Arc;

use url::Url;

use crate::application::services::{AnalyticsService, LinkService, RedirectService};
use crate::domain::repositories::EventStore;
use crate::infrastructure::queue::EventQueue;
use crate::infrastructure::registry::UrlRegistry;

/// Services and components shared by all requests.
///
/// Cloning is cheap: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub redirect_service: Arc<RedirectService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub link_service: Arc<LinkService>,
    pub registry: Arc<UrlRegistry>,
    pub queue: Arc<EventQueue>,
}

impl AppState {
    /// Wires services around an existing registry, store and queue.
    ///
    /// `queue` must deliver into `store` for analytics reads to observe clicks.
    pub fn new(
        registry: Arc<UrlRegistry>,
        store: Arc<dyn EventStore>,
        queue: Arc<EventQueue>,
        base_url: Url,
    ) -> Self {
        Self {
            redirect_service: Arc::new(RedirectService::new(registry.clone(), queue.clone())),
            analytics_service: Arc::new(AnalyticsService::new(store)),
            link_service: Arc::new(LinkService::new(registry.clone(), base_url)),
            registry,
            queue,
        }
    }
}

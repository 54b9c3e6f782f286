//! Short id resolution and click recording.

use std::sync::Arc;

use crate::domain::entities::{ClickEvent, RequestMetadata};
use crate::infrastructure::queue::EventQueue;
use crate::infrastructure::registry::UrlRegistry;
use tracing::{debug, warn};

/// HTTP redirect semantic applied to a resolved short link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// `302 Found`, not cached by clients.
    Temporary,
}

/// Destination of a resolved short link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectDecision {
    pub location: String,
    pub kind: RedirectKind,
}

/// Result of resolving a short id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Redirect(RedirectDecision),
    NotFound,
}

/// Resolves short ids against the registry and records a click for every hit.
///
/// Click submission is fire-and-forget: a rejected submission is logged and the
/// redirect is returned anyway.
pub struct RedirectService {
    registry: Arc<UrlRegistry>,
    queue: Arc<EventQueue>,
}

impl RedirectService {
    pub fn new(registry: Arc<UrlRegistry>, queue: Arc<EventQueue>) -> Self {
        Self { registry, queue }
    }

    /// Looks up `short_id` and, on a hit, enqueues one [`ClickEvent`].
    ///
    /// Never waits for the event to be persisted.
    pub fn resolve(&self, short_id: &str, metadata: RequestMetadata) -> Resolution {
        let Some(location) = self.registry.get(short_id) else {
            debug!("Short id not found: {}", short_id);
            return Resolution::NotFound;
        };

        let event = ClickEvent::new(short_id, metadata);
        if let Err(e) = self.queue.submit(event) {
            warn!("Click for {} not recorded: {}", short_id, e);
        }

        Resolution::Redirect(RedirectDecision {
            location,
            kind: RedirectKind::Temporary,
        })
    }
}

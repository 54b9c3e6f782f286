//! # Shortlink Tracker
//!
//! Resolves short ids to their destination URLs and records a click event for
//! every redirect, without letting click recording slow down or break the
//! redirect path.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities and the event store contract
//! - **Application Layer** ([`application`]) - Redirect, analytics and link services
//! - **Infrastructure Layer** ([`infrastructure`]) - URL registry, event stores, click queue
//! - **API Layer** ([`api`]) - HTTP handlers, DTOs, and middleware
//!
//! ## Click pipeline
//!
//! 1. `GET /{short_id}` resolves the id in the [`infrastructure::registry::UrlRegistry`]
//! 2. A [`domain::entities::ClickEvent`] is submitted to the
//!    [`infrastructure::queue::EventQueue`] without waiting
//! 3. Consumer loops append it to the [`domain::repositories::EventStore`], retrying
//!    with capped linear backoff and dead-lettering once the budget is spent
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AnalyticsService, LinkService, RedirectService, Resolution,
    };
    pub use crate::domain::entities::{ClickEvent, RequestMetadata, ShortLink};
    pub use crate::domain::repositories::{EventStore, StoreError};
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::InMemoryEventStore;
    pub use crate::infrastructure::queue::{EventQueue, QueueConfig, RetryPolicy};
    pub use crate::infrastructure::registry::UrlRegistry;
    pub use crate::state::AppState;
}

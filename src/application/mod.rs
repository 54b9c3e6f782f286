//! Application layer services.
//!
//! Services coordinate the registry, the click queue and the event store, and
//! provide a small API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::RedirectService`] - Short id resolution and click submission
//! - [`services::AnalyticsService`] - Click event listing
//! - [`services::LinkService`] - Short link minting and HTML rewriting

pub mod services;

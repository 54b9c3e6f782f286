//! Domain layer containing business entities and storage contracts.
//!
//! - [`entities`] - Core data structures ([`entities::ShortLink`], [`entities::ClickEvent`])
//! - [`repositories`] - Storage trait definitions
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves a short id through
//!    [`crate::application::services::RedirectService`]
//! 2. A [`entities::ClickEvent`] is submitted to [`crate::infrastructure::queue::EventQueue`]
//! 3. Consumer loops persist it via [`repositories::EventStore`], retrying with backoff

pub mod entities;
pub mod repositories;

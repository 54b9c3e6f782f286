//! HTTP API layer.
//!
//! # Modules
//!
//! - [`dto`] - Response serialization types
//! - [`extractors`] - Request metadata extraction
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request tracing
//! - [`routes`] - Route configuration

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;

//! Data Transfer Objects for API responses.

pub mod clicks;
pub mod health;

//! Core domain entities.
//!
//! - [`ShortLink`] - A short identifier and its destination URL
//! - [`ClickEvent`] - One recorded redirect
//! - [`RequestMetadata`] - Request-derived inputs of a click event

pub mod click;
pub mod link;

pub use click::{ClickEvent, RequestMetadata, UNKNOWN_USER_AGENT};
pub use link::ShortLink;

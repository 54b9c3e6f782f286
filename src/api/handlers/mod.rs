//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod analytics;
pub mod health;
pub mod process_html;
pub mod redirect;

pub use analytics::{analytics_by_short_id_handler, analytics_list_handler};
pub use health::health_handler;
pub use process_html::process_html_handler;
pub use redirect::redirect_handler;

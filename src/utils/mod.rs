//! Helper utilities.
//!
//! - [`code_generator`] - Random short id minting
//! - [`html_rewriter`] - Anchor `href` rewriting

pub mod code_generator;
pub mod html_rewriter;

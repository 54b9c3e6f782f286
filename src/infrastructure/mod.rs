//! Infrastructure layer: storage backends, the URL registry and the click queue.
//!
//! - [`registry`] - Concurrent in-memory short id mapping
//! - [`persistence`] - Event store backends (in-memory, Redis)
//! - [`queue`] - At-least-once click event queue

pub mod persistence;
pub mod queue;
pub mod registry;

//! Animation primitives shared by the tree, the bloom and the particle stream
//!
//! Easing curves plus the frame-clock task scheduler.

mod easing;
mod scheduler;

pub use easing::{Easing, ease};
pub use scheduler::{TaskId, Timeline};

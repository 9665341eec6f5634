//! Text shown once the heart has bloomed

mod clock;
mod typewriter;

pub use clock::{Elapsed, ElapsedClock};
pub use typewriter::Typewriter;

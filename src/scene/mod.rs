//! Scene sequencing

pub mod drop;
pub mod orchestrator;

pub use drop::{DropSettings, SeedFall};
pub use orchestrator::{Phase, PhaseOrchestrator};

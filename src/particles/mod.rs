//! Sprite systems: the heart bloom and the particle stream

pub mod bloom;
pub mod stream;

pub use bloom::{BloomField, BloomSettings, BloomSummary, Entrance};
pub use stream::{Particle, ParticleChoreographer, StreamSettings, StreamTarget};

pub mod vec2;
pub mod bezier;

pub use vec2::{Vec2, Rect};
pub use bezier::{CubicBezier, CurveSample, evaluate};

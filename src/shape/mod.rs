pub mod heart;

pub use heart::{HeartShape, boundary_points, heart_point, interior_points, DEFAULT_ANGULAR_STEP};

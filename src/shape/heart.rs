//! Heart curve sampling
//!
//! The heart is the classic parametric curve
//! `x(θ) = 16 sin³θ`, `y(θ) = 13 cosθ − 5 cos2θ − 2 cos3θ − cos4θ`,
//! scaled per axis and flipped so that it stands upright in screen space.

use std::f32::consts::TAU;
use rand::Rng;
use crate::math::Vec2;

/// Angular step used when tracing the outline
pub const DEFAULT_ANGULAR_STEP: f32 = 0.01;

/// Parametric y below which interior samples are thinned out (the lower cusp)
const CUSP_THRESHOLD: f32 = -10.0;

/// Probability of discarding a sample that falls below the cusp threshold
const CUSP_REJECTION: f64 = 0.5;

/// Attempt budget per requested interior point
const ATTEMPTS_PER_POINT: usize = 5;

/// Raw (unscaled, y-up) heart curve value at angle `theta`
pub fn heart_point(theta: f32) -> Vec2 {
    let x = 16.0 * theta.sin().powi(3);
    let y = 13.0 * theta.cos()
        - 5.0 * (2.0 * theta).cos()
        - 2.0 * (3.0 * theta).cos()
        - (4.0 * theta).cos();
    Vec2::new(x, y)
}

fn to_surface(center: Vec2, raw: Vec2, scale_x: f32, scale_y: f32) -> Vec2 {
    Vec2::new(center.x + raw.x * scale_x, center.y - raw.y * scale_y)
}

/// Ordered outline of the heart, walking θ over [0, 2π] at `angular_step`.
///
/// The sequence is open: the last point sits one step short of the first,
/// so joining it back to the first closes the polygon.
pub fn boundary_points(center: Vec2, scale_x: f32, scale_y: f32, angular_step: f32) -> Vec<Vec2> {
    if !angular_step.is_finite() || angular_step <= 0.0 {
        return Vec::new();
    }

    let steps = (TAU / angular_step).floor() as usize;
    (0..=steps)
        .map(|i| i as f32 * angular_step)
        .filter(|theta| *theta <= TAU)
        .map(|theta| to_surface(center, heart_point(theta), scale_x, scale_y))
        .collect()
}

/// Randomly scattered points filling the heart.
///
/// Radius is drawn as `sqrt(u)` so samples spread by area instead of
/// clumping at the centre. Half of the samples under the lower cusp are
/// discarded. At most `5 × count` candidates are drawn, so the result may
/// hold fewer than `count` points.
pub fn interior_points<R: Rng + ?Sized>(
    center: Vec2,
    scale_x: f32,
    scale_y: f32,
    count: usize,
    rng: &mut R,
) -> Vec<Vec2> {
    let mut points = Vec::with_capacity(count);
    let max_attempts = count.saturating_mul(ATTEMPTS_PER_POINT);
    let mut attempts = 0;

    while points.len() < count && attempts < max_attempts {
        attempts += 1;

        let theta = rng.gen_range(0.0..TAU);
        let r = rng.gen::<f32>().sqrt();
        let raw = heart_point(theta);

        if raw.y < CUSP_THRESHOLD && rng.gen_bool(CUSP_REJECTION) {
            continue;
        }

        points.push(to_surface(center, raw.scale(r), scale_x, scale_y));
    }

    if points.len() < count {
        log::debug!(
            "heart interior sampler filled {} of {} points in {} attempts",
            points.len(),
            count,
            attempts
        );
    }

    points
}

/// A heart placed on the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartShape {
    pub center: Vec2,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl HeartShape {
    pub fn new(center: Vec2, scale_x: f32, scale_y: f32) -> Self {
        Self { center, scale_x, scale_y }
    }

    pub fn boundary(&self) -> Vec<Vec2> {
        boundary_points(self.center, self.scale_x, self.scale_y, DEFAULT_ANGULAR_STEP)
    }

    pub fn interior<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Vec2> {
        interior_points(self.center, self.scale_x, self.scale_y, count, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn extent(points: &[Vec2]) -> (f32, f32) {
        let min_x = points.iter().map(|p| p.x).fold(f32::MAX, f32::min);
        let max_x = points.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        let min_y = points.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        let max_y = points.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        (max_x - min_x, max_y - min_y)
    }

    #[test]
    fn test_heart_point_landmarks() {
        // Top notch and bottom tip
        let top = heart_point(0.0);
        assert!(top.x.abs() < 0.0001);
        assert!((top.y - 5.0).abs() < 0.0001);

        let bottom = heart_point(std::f32::consts::PI);
        assert!(bottom.x.abs() < 0.0001);
        assert!((bottom.y + 17.0).abs() < 0.0001);
    }

    #[test]
    fn test_boundary_is_closed() {
        let points = boundary_points(Vec2::new(200.0, 200.0), 19.0, 19.0, DEFAULT_ANGULAR_STEP);
        assert_eq!(points.len(), 629);

        let max_gap = points
            .windows(2)
            .map(|w| w[0].distance(&w[1]))
            .fold(0.0, f32::max);
        let closing_gap = points[points.len() - 1].distance(&points[0]);
        assert!(closing_gap <= max_gap * 1.5, "outline should wrap back to its start");
    }

    #[test]
    fn test_boundary_scales_linearly() {
        let center = Vec2::new(50.0, 80.0);
        let (w1, h1) = extent(&boundary_points(center, 10.0, 10.0, DEFAULT_ANGULAR_STEP));
        let (w2, h2) = extent(&boundary_points(center, 20.0, 5.0, DEFAULT_ANGULAR_STEP));
        assert!((w2 / w1 - 2.0).abs() < 0.0001);
        assert!((h2 / h1 - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_boundary_rejects_bad_step() {
        assert!(boundary_points(Vec2::ZERO, 1.0, 1.0, 0.0).is_empty());
        assert!(boundary_points(Vec2::ZERO, 1.0, 1.0, f32::NAN).is_empty());
    }

    #[test]
    fn test_interior_bounded() {
        let mut rng = StdRng::seed_from_u64(42);
        let shape = HeartShape::new(Vec2::new(300.0, 300.0), 19.0, 19.0);
        let points = shape.interior(550, &mut rng);
        assert!(points.len() <= 550);
        assert!(!points.is_empty());
    }

    #[test]
    fn test_interior_inside_extent() {
        let mut rng = StdRng::seed_from_u64(3);
        let center = Vec2::new(0.0, 0.0);
        for p in interior_points(center, 2.0, 3.0, 300, &mut rng) {
            assert!(p.x.abs() <= 16.0 * 2.0 + 0.001);
            assert!(p.y >= -13.0 * 3.0 - 0.001 && p.y <= 17.0 * 3.0 + 0.001);
        }
    }

    #[test]
    fn test_interior_zero_count() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(interior_points(Vec2::ZERO, 1.0, 1.0, 0, &mut rng).is_empty());
    }

    /// Always-zero generator: every θ is 0, which never trips the cusp, so
    /// every attempt lands and the sampler fills exactly.
    #[test]
    fn test_interior_terminates_with_constant_rng() {
        let mut rng = rand::rngs::mock::StepRng::new(0, 0);
        let points = interior_points(Vec2::ZERO, 1.0, 1.0, 10, &mut rng);
        assert_eq!(points.len(), 10);
    }

    /// Pins θ at π (deep in the cusp) and makes every rejection roll succeed
    #[derive(Default)]
    struct CuspRng {
        words: usize,
        rolls: usize,
    }

    impl rand::RngCore for CuspRng {
        fn next_u32(&mut self) -> u32 {
            self.words += 1;
            0x8000_0000
        }

        fn next_u64(&mut self) -> u64 {
            self.rolls += 1;
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_interior_underfills_at_attempt_cap() {
        assert!(heart_point(std::f32::consts::PI).y < CUSP_THRESHOLD);

        let mut rng = CuspRng::default();
        let count = 12;
        let points = interior_points(Vec2::ZERO, 1.0, 1.0, count, &mut rng);
        assert!(points.len() < count);
        assert!(points.is_empty());
        // one rejection roll per attempt
        assert!(rng.rolls <= ATTEMPTS_PER_POINT * count);
        assert_eq!(rng.rolls, ATTEMPTS_PER_POINT * count);
        assert_eq!(rng.words, 2 * rng.rolls);
    }
}

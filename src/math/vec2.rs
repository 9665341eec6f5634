use std::ops::{Add, Sub};
use serde::{Deserialize, Serialize};
use rand::Rng;

/// 2D point in surface pixel space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians)
    pub fn from_angle(angle: f32) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn scale(&self, s: f32) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
        }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

/// Axis-aligned rectangle used for spawn and landing regions
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle of the given size centred on `center`
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        let half = Vec2::new(width / 2.0, height / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.min.lerp(&self.max, 0.5)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Uniformly distributed point inside the rectangle
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let tx: f32 = rng.gen();
        let ty: f32 = rng.gen();
        Vec2::new(
            self.min.x + (self.max.x - self.min.x) * tx,
            self.min.y + (self.max.y - self.min.y) * ty,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_vec2_length() {
        let v = Vec2::new(3.0, 4.0);
        assert!((v.length() - 5.0).abs() < 0.0001);
    }

    #[test]
    fn test_vec2_from_angle() {
        let v = Vec2::from_angle(std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 0.0001);
        assert!((v.y - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_vec2_lerp() {
        let a = Vec2::ZERO;
        let b = Vec2::new(10.0, 20.0);
        let mid = a.lerp(&b, 0.5);
        assert!((mid.x - 5.0).abs() < 0.0001);
        assert!((mid.y - 10.0).abs() < 0.0001);
    }

    #[test]
    fn test_vec2_ops() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 5.0);
        assert_eq!((a + b).x, 5.0);
        assert_eq!((b - a).y, 3.0);
        assert_eq!(a.scale(2.0).y, 4.0);
    }

    #[test]
    fn test_rect_centered() {
        let r = Rect::centered(Vec2::new(100.0, 50.0), 400.0, 180.0);
        assert_eq!(r.min, Vec2::new(-100.0, -40.0));
        assert_eq!(r.max, Vec2::new(300.0, 140.0));
        assert_eq!(r.center(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_rect_sample_inside() {
        let mut rng = StdRng::seed_from_u64(7);
        let r = Rect::new(Vec2::new(10.0, 20.0), Vec2::new(30.0, 25.0));
        for _ in 0..200 {
            assert!(r.contains(r.sample(&mut rng)));
        }
    }
}

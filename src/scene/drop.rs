//! The seed drop that opens every cycle

use serde::{Deserialize, Serialize};
use crate::animation::{ease, Easing};
use crate::math::Vec2;
use crate::render::{AssetId, Layer, Sprite, SpriteId, Viewport};

/// The clickable heart shown while idle
pub const TRIGGER_ID: SpriteId = SpriteId { layer: Layer::Seed, serial: 0 };
/// The falling seed
pub const SEED_ID: SpriteId = SpriteId { layer: Layer::Seed, serial: 1 };

/// Timings and geometry of the drop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropSettings {
    /// Pause after the trigger hides
    pub hide_delay: f32,
    pub fall_duration: f32,
    /// Pause between the ground line appearing and the trunk starting
    pub settle_delay: f32,
    /// The seed stops this far above the bottom edge
    pub floor_offset: f32,
    /// The ground line sits this far above the bottom edge
    pub ground_offset: f32,
    pub trigger_size: f32,
    pub seed_size: f32,
}

impl Default for DropSettings {
    fn default() -> Self {
        Self {
            hide_delay: 0.5,
            fall_duration: 2.0,
            settle_delay: 0.6,
            floor_offset: 90.0,
            ground_offset: 70.0,
            trigger_size: 60.0,
            seed_size: 24.0,
        }
    }
}

impl DropSettings {
    pub fn ground_y(&self, viewport: Viewport) -> f32 {
        viewport.height - self.ground_offset
    }

    pub fn trigger_sprite(&self, at: Vec2) -> Sprite {
        Sprite::new(TRIGGER_ID, AssetId::Seed, at, self.trigger_size)
    }
}

/// Smoothstep fall from the trigger down to the floor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedFall {
    from: Vec2,
    floor_y: f32,
    started_at: f64,
    duration: f32,
    size: f32,
}

impl SeedFall {
    pub fn new(from: Vec2, viewport: Viewport, started_at: f64, settings: &DropSettings) -> Self {
        Self {
            from,
            floor_y: viewport.height - settings.floor_offset,
            started_at,
            duration: settings.fall_duration,
            size: settings.seed_size,
        }
    }

    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) as f32 / self.duration).clamp(0.0, 1.0)
    }

    pub fn position(&self, now: f64) -> Vec2 {
        let eased = ease(self.progress(now), Easing::Smoothstep);
        Vec2::new(self.from.x, self.from.y + (self.floor_y - self.from.y) * eased)
    }

    pub fn sprite(&self, now: f64) -> Sprite {
        Sprite::new(SEED_ID, AssetId::Seed, self.position(now), self.size)
    }

    pub fn is_landed(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fall_path() {
        let viewport = Viewport::new(800.0, 900.0);
        let fall = SeedFall::new(Vec2::new(400.0, 450.0), viewport, 1.0, &DropSettings::default());

        assert_eq!(fall.position(0.5), Vec2::new(400.0, 450.0));
        assert_eq!(fall.position(1.0), Vec2::new(400.0, 450.0));
        // smoothstep is symmetric around the midpoint
        assert!((fall.position(2.0).y - 630.0).abs() < 0.01);
        assert!(!fall.is_landed(2.9));
        assert!(fall.is_landed(3.0));
        assert_eq!(fall.position(5.0), Vec2::new(400.0, 810.0));
    }

    #[test]
    fn test_zero_duration_lands_at_once() {
        let settings = DropSettings {
            fall_duration: 0.0,
            ..DropSettings::default()
        };
        let fall = SeedFall::new(Vec2::ZERO, Viewport::new(100.0, 100.0), 0.0, &settings);
        assert!(fall.is_landed(0.0));
        assert_eq!(fall.sprite(0.0).center, Vec2::new(0.0, 10.0));
    }
}

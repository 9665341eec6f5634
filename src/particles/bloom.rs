//! Heart bloom: a ring of sprites on the outline plus a filled interior
//!
//! Every sprite is placed invisible and then animates in after its own small
//! delay, either fading in or popping in with a slight overshoot.

use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::animation::{ease, Easing};
use crate::math::Vec2;
use crate::render::{AssetId, Layer, Sprite, SpriteId, Surface};
use crate::shape::HeartShape;

const QUARTER_TURNS: [f32; 4] = [0.0, 90.0, 180.0, 270.0];

/// Tunables for the bloom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomSettings {
    pub ring_count: usize,
    pub interior_count: usize,
    pub ring_size: f32,
    pub interior_size: f32,
    /// Delay added per sprite index
    pub stagger: f32,
    /// Random extra delay per sprite
    pub jitter: f32,
    pub fade_duration: f32,
    pub pop_duration: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            ring_count: 40,
            interior_count: 550,
            ring_size: 40.0,
            interior_size: 35.0,
            stagger: 0.005,
            jitter: 0.2,
            fade_duration: 0.6,
            pop_duration: 0.8,
        }
    }
}

/// How a sprite appears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entrance {
    /// Opacity eases out from 0
    Fade,
    /// Scale grows from 0 with anticipation and overshoot
    Pop,
}

#[derive(Debug, Clone)]
struct Bloomer {
    sprite: Sprite,
    final_opacity: f32,
    entrance: Entrance,
    delay: f32,
    duration: f32,
    settled: bool,
}

impl Bloomer {
    fn frame(&self, clock: f64) -> Option<Sprite> {
        let local = (clock - f64::from(self.delay)) as f32;
        if local < 0.0 {
            return None;
        }
        let t = if self.duration > 0.0 { (local / self.duration).min(1.0) } else { 1.0 };

        let mut sprite = self.sprite.clone();
        match self.entrance {
            Entrance::Fade => {
                sprite.scale = 1.0;
                sprite.opacity = self.final_opacity * ease(t, Easing::EaseOut);
            }
            Entrance::Pop => {
                let eased = ease(t, Easing::EaseInOutBack);
                sprite.scale = eased.max(0.0);
                sprite.opacity = self.final_opacity * eased.clamp(0.0, 1.0);
            }
        }
        Some(sprite)
    }
}

/// How many sprites were placed by the last bloom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloomSummary {
    pub ring: usize,
    pub interior: usize,
}

/// The two graded sprite sets of the bloom
#[derive(Debug, Clone, Default)]
pub struct BloomField {
    pub settings: BloomSettings,
    clock: f64,
    bloomers: Vec<Bloomer>,
}

impl BloomField {
    pub fn new(settings: BloomSettings) -> Self {
        Self {
            settings,
            clock: 0.0,
            bloomers: Vec::new(),
        }
    }

    /// Clear any previous bloom and place a new one on `shape`
    pub fn place<R: Rng + ?Sized>(
        &mut self,
        shape: &HeartShape,
        rng: &mut R,
        surface: &mut dyn Surface,
    ) -> BloomSummary {
        self.clear(surface);

        let outline = shape.boundary();
        let ring_count = if outline.is_empty() { 0 } else { self.settings.ring_count };
        let step = (outline.len() / ring_count.max(1)).max(1);
        for i in 0..ring_count {
            let jitter = ring_jitter(step, rng);
            let index = (i * step + jitter).min(outline.len() - 1);
            let id = SpriteId::new(Layer::Boundary, i as u64);
            let size = self.settings.ring_size;
            self.push(rng, id, outline[index], size, i);
        }

        let interior = shape.interior(self.settings.interior_count, rng);
        for (i, point) in interior.iter().enumerate() {
            let id = SpriteId::new(Layer::Interior, i as u64);
            let size = self.settings.interior_size;
            self.push(rng, id, *point, size, i);
        }

        for bloomer in &self.bloomers {
            surface.place_sprite(&bloomer.sprite);
        }

        let summary = BloomSummary {
            ring: ring_count,
            interior: interior.len(),
        };
        log::info!(
            "heart bloom placed: {} on the outline, {} inside",
            summary.ring,
            summary.interior
        );
        summary
    }

    fn push<R: Rng + ?Sized>(&mut self, rng: &mut R, id: SpriteId, center: Vec2, size: f32, index: usize) {
        let mut sprite = Sprite::new(id, AssetId::random_photo(rng), center, size);
        sprite.rotation_deg = QUARTER_TURNS[rng.gen_range(0..QUARTER_TURNS.len())];
        sprite.opacity = 0.0;
        sprite.scale = 1.0;

        let final_opacity = 0.7 + rng.gen::<f32>() * 0.2;
        let (entrance, duration) = if rng.gen_bool(0.5) {
            (Entrance::Fade, self.settings.fade_duration)
        } else {
            (Entrance::Pop, self.settings.pop_duration)
        };
        let delay = index as f32 * self.settings.stagger + rng.gen::<f32>() * self.settings.jitter;

        self.bloomers.push(Bloomer {
            sprite,
            final_opacity,
            entrance,
            delay,
            duration,
            settled: false,
        });
    }

    /// Advance entrance animations by `dt`
    pub fn tick(&mut self, dt: f32, surface: &mut dyn Surface) {
        if dt.is_finite() && dt > 0.0 {
            self.clock += f64::from(dt);
        }
        for bloomer in self.bloomers.iter_mut().filter(|b| !b.settled) {
            if let Some(sprite) = bloomer.frame(self.clock) {
                surface.place_sprite(&sprite);
                if self.clock - f64::from(bloomer.delay) >= f64::from(bloomer.duration) {
                    bloomer.settled = true;
                }
            }
        }
    }

    /// Remove the bloom from the surface
    pub fn clear(&mut self, surface: &mut dyn Surface) {
        surface.clear_layer(Layer::Boundary);
        surface.clear_layer(Layer::Interior);
        self.bloomers.clear();
        self.clock = 0.0;
    }

    /// Every sprite has finished its entrance
    pub fn is_settled(&self) -> bool {
        self.bloomers.iter().all(|b| b.settled)
    }

    pub fn len(&self) -> usize {
        self.bloomers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bloomers.is_empty()
    }
}

/// Random offset along the outline, up to half a ring step
fn ring_jitter<R: Rng + ?Sized>(step: usize, rng: &mut R) -> usize {
    (rng.gen::<f32>() * (step as f32 / 2.0).max(1.0)) as usize
}

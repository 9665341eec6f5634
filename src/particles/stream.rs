//! Particle stream from the tree to the timer
//!
//! Each particle is launched after its own staggered delay, flies a straight
//! line with a decaying sideways sway, and is removed as soon as its own
//! progress reaches 1. Particles never look at each other; the only shared
//! data is the stream's target, captured once when the stream is spawned.

use std::f32::consts::{PI, TAU};
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::animation::Timeline;
use crate::math::{Rect, Vec2};
use crate::render::{AssetId, Layer, Sprite, SpriteId, Surface};

/// Tunables for the particle stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    /// Landing window around the anchor
    pub window_width: f32,
    pub window_height: f32,
    /// Divides the base flight time; lower is slower
    pub fall_rate: f32,
    /// Distance past the reference line over which a particle fades out
    pub fade_distance: f32,
    pub size: f32,
    /// Seconds between consecutive launches
    pub launch_interval: f32,
    /// Extra random delay added to each launch
    pub launch_jitter: f32,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            window_width: 400.0,
            window_height: 180.0,
            fall_rate: 0.7,
            fade_distance: 160.0,
            size: 32.0,
            launch_interval: 0.6,
            launch_jitter: 0.25,
        }
    }
}

/// Read-only destination data shared by every particle of one stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamTarget {
    pub window: Rect,
    pub reference_line_y: f32,
}

#[derive(Debug, Clone, Copy)]
struct Launch {
    index: usize,
    source: Rect,
    target: StreamTarget,
}

/// One particle's fixed trajectory parameters
#[derive(Debug, Clone)]
pub struct Particle {
    pub id: SpriteId,
    /// Position in its stream, also used as a phase offset
    pub index: usize,
    pub asset: AssetId,
    pub source: Vec2,
    pub destination: Vec2,
    pub born_at: f64,
    pub duration: f32,
    pub wobble: f32,
    pub sway_freq: f32,
    pub sway_amp: f32,
    pub scale: f32,
    pub rotation: f32,
    pub opacity: f32,
    pub size: f32,
    reference_line_y: f32,
    fade_distance: f32,
}

impl Particle {
    fn launch<R: Rng + ?Sized>(
        rng: &mut R,
        id: SpriteId,
        launch: &Launch,
        born_at: f64,
        settings: &StreamSettings,
    ) -> Self {
        let fall_rate = if settings.fall_rate > 0.0 { settings.fall_rate } else { 1.0 };
        Self {
            id,
            index: launch.index,
            asset: AssetId::random_photo(rng),
            source: launch.source.sample(rng),
            destination: launch.target.window.sample(rng),
            born_at,
            duration: (2.6 + rng.gen::<f32>() * 1.2) / fall_rate,
            wobble: 18.0 + rng.gen::<f32>() * 22.0,
            sway_freq: 1.2 + rng.gen::<f32>() * 1.2,
            sway_amp: 0.7 + rng.gen::<f32>() * 0.7,
            scale: 0.9 + rng.gen::<f32>() * 0.3,
            rotation: (rng.gen::<f32>() - 0.5) * 60.0,
            opacity: 0.92 + rng.gen::<f32>() * 0.08,
            size: settings.size,
            reference_line_y: launch.target.reference_line_y,
            fade_distance: settings.fade_distance,
        }
    }

    pub fn progress(&self, now: f64) -> f32 {
        ((now - self.born_at) as f32 / self.duration).clamp(0.0, 1.0)
    }

    /// Sprite for progress `t`
    pub fn frame(&self, t: f32) -> Sprite {
        let phase = self.index as f32;
        let base = self.source.lerp(&self.destination, t);
        let sway = (t * TAU * self.sway_freq + phase).sin() * self.wobble * (1.0 - t) * self.sway_amp;

        let mut opacity = self.opacity;
        if base.y > self.reference_line_y {
            opacity = (1.0 - (base.y - self.reference_line_y) / self.fade_distance).max(0.0);
        }

        Sprite {
            id: self.id,
            asset: self.asset,
            center: Vec2::new(base.x + sway, base.y),
            size: self.size,
            rotation_deg: self.rotation + (t * 2.5 + phase).sin() * 18.0 + (t * 6.0 + phase).sin() * 6.0,
            scale: self.scale * (0.98 + 0.08 * (t * PI).sin()),
            opacity,
        }
    }
}

/// Spawns and animates particle streams
#[derive(Debug, Clone)]
pub struct ParticleChoreographer {
    pub settings: StreamSettings,
    clock: Timeline<Launch>,
    particles: Vec<Particle>,
    next_serial: u64,
    spawned: usize,
    retired: usize,
}

impl ParticleChoreographer {
    pub fn new(settings: StreamSettings) -> Self {
        Self {
            settings,
            clock: Timeline::new(),
            particles: Vec::new(),
            next_serial: 0,
            spawned: 0,
            retired: 0,
        }
    }

    /// Queue `count` particles flying from `source` to the window around `anchor`.
    ///
    /// Launch `i` happens `i·interval + jitter` seconds from now. Particles fade
    /// out once they pass below `reference_line_y`.
    pub fn spawn_stream<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        source: Rect,
        anchor: Vec2,
        reference_line_y: f32,
        rng: &mut R,
    ) -> StreamTarget {
        let target = StreamTarget {
            window: Rect::centered(anchor, self.settings.window_width, self.settings.window_height),
            reference_line_y,
        };

        for index in 0..count {
            let delay = index as f32 * self.settings.launch_interval
                + rng.gen::<f32>() * self.settings.launch_jitter;
            self.clock.schedule_in(delay, Launch { index, source, target });
        }

        log::info!("particle stream of {} queued toward ({:.0}, {:.0})", count, anchor.x, anchor.y);
        target
    }

    /// Advance every particle by `dt`, launching due ones and retiring finished ones
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R, surface: &mut dyn Surface) {
        let now = self.clock.advance(dt);

        for (due, launch) in self.clock.drain_due() {
            let id = SpriteId::new(Layer::Stream, self.next_serial);
            self.next_serial += 1;
            self.particles
                .push(Particle::launch(rng, id, &launch, due, &self.settings));
            self.spawned += 1;
        }

        let mut retired = 0;
        self.particles.retain(|particle| {
            let t = particle.progress(now);
            surface.place_sprite(&particle.frame(t));
            if t >= 1.0 {
                surface.remove_sprite(particle.id);
                retired += 1;
                false
            } else {
                true
            }
        });
        self.retired += retired;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Particles launched so far
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    /// Particles that finished and were removed
    pub fn retired(&self) -> usize {
        self.retired
    }

    pub fn active(&self) -> usize {
        self.particles.len()
    }

    /// Launches still waiting for their delay
    pub fn queued(&self) -> usize {
        self.clock.pending()
    }

    /// Nothing queued and nothing in flight
    pub fn is_idle(&self) -> bool {
        self.particles.is_empty() && self.clock.is_empty()
    }
}

impl Default for ParticleChoreographer {
    fn default() -> Self {
        Self::new(StreamSettings::default())
    }
}

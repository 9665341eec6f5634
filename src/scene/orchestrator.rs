//! Phase orchestrator
//!
//! Sequences trigger → drop → growth → bloom → reveal → stream. Every delay
//! between phases is a task on the orchestrator's own timeline, so a restart
//! cancels them all in one call. Growth hands over through the cycle's
//! completion signal rather than a callback.

use std::fmt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::animation::{ease, Easing, Timeline};
use crate::config::SceneConfig;
use crate::error::PhaseError;
use crate::growth::{CompletionSignal, CycleContext, GrowthAnimator};
use crate::math::{Rect, Vec2};
use crate::particles::{BloomField, ParticleChoreographer, StreamTarget};
use crate::render::{Surface, TextSlot, Viewport};
use crate::reveal::{ElapsedClock, Typewriter};
use crate::shape::HeartShape;
use super::drop::{SeedFall, SEED_ID, TRIGGER_ID};

/// Where the scene is in its sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Drop,
    Growth,
    Bloom,
    Reveal,
    Stream,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Drop => "drop",
            Phase::Growth => "growth",
            Phase::Bloom => "bloom",
            Phase::Reveal => "reveal",
            Phase::Stream => "stream",
        }
    }

    /// Phases during which a new activation is refused
    pub fn is_exclusive(&self) -> bool {
        matches!(self, Phase::Drop | Phase::Growth)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cue {
    BeginFall,
    BeginGrowth,
    BeginShift,
    BeginReveal,
    RefreshTimer,
}

const TEXT_SLOTS: [TextSlot; 3] = [TextSlot::Timer, TextSlot::Caption, TextSlot::Letter];

/// Owns every animated component of the scene and moves it through its phases
pub struct PhaseOrchestrator {
    config: SceneConfig,
    phase: Phase,
    clock: Timeline<Cue>,
    rng: StdRng,
    animator: GrowthAnimator,
    bloom: BloomField,
    stream: ParticleChoreographer,
    signal: Option<CompletionSignal>,
    fall: Option<SeedFall>,
    shift_started: Option<f64>,
    typewriter: Option<Typewriter>,
    timer: ElapsedClock,
    stream_target: Option<StreamTarget>,
    trigger: Vec2,
    cycles: u64,
    now_ms: f64,
}

impl PhaseOrchestrator {
    pub fn new(config: SceneConfig, viewport: Viewport, seed: u64) -> Self {
        Self {
            phase: Phase::Idle,
            clock: Timeline::new(),
            rng: StdRng::seed_from_u64(seed),
            animator: GrowthAnimator::new(config.tree.clone(), viewport),
            bloom: BloomField::new(config.bloom.clone()),
            stream: ParticleChoreographer::new(config.stream.clone()),
            signal: None,
            fall: None,
            shift_started: None,
            typewriter: None,
            timer: ElapsedClock::new(config.since_ms),
            stream_target: None,
            trigger: viewport.center(),
            cycles: 0,
            now_ms: config.since_ms,
            config,
        }
    }

    /// Draw the idle scene: the trigger, with every text slot hidden
    pub fn prepare(&mut self, surface: &mut dyn Surface) {
        self.trigger = surface.viewport().center();
        surface.place_sprite(&self.config.drop.trigger_sprite(self.trigger));
        surface.set_text(TextSlot::Hint, &self.config.hint);
        surface.set_text_visible(TextSlot::Hint, false);
        for slot in TEXT_SLOTS {
            surface.set_text_visible(slot, false);
        }
        surface.set_ground_line(None);
    }

    /// Follow a viewport change. The trigger re-centres at once; tree geometry
    /// waits for the next growth cycle.
    pub fn relayout(&mut self, surface: &mut dyn Surface) {
        self.trigger = surface.viewport().center();
        if self.phase == Phase::Idle {
            surface.place_sprite(&self.config.drop.trigger_sprite(self.trigger));
        }
    }

    /// Start a new cycle.
    ///
    /// Refused while a drop or growth is in progress. From a later phase the
    /// previous bloom, tree and text are cleared first; particles already in
    /// flight finish on their own.
    pub fn activate(&mut self, surface: &mut dyn Surface) -> Result<(), PhaseError> {
        if self.phase.is_exclusive() {
            log::warn!("activation ignored, {} phase still running", self.phase);
            return Err(PhaseError::CycleInProgress { phase: self.phase.name() });
        }
        if self.phase != Phase::Idle {
            self.clear_cycle(surface);
        }

        self.enter(Phase::Drop);
        surface.remove_sprite(TRIGGER_ID);
        surface.set_text_visible(TextSlot::Hint, false);
        let due = self.clock.now() + f64::from(self.config.drop.hide_delay);
        self.clock.schedule_at(due, Cue::BeginFall);
        Ok(())
    }

    /// Pointer entered or left the trigger
    pub fn hover(&mut self, inside: bool, surface: &mut dyn Surface) {
        surface.set_text_visible(TextSlot::Hint, inside);
    }

    /// Whether `point` lies on the trigger
    pub fn hits_trigger(&self, point: Vec2) -> bool {
        point.distance(&self.trigger) <= self.config.drop.trigger_size / 2.0
    }

    /// Advance the whole scene by `dt` seconds; `now_ms` is wall-clock time for the timer
    pub fn tick(&mut self, dt: f32, now_ms: f64, surface: &mut dyn Surface) {
        self.now_ms = now_ms;
        let now = self.clock.advance(dt);
        for (due, cue) in self.clock.drain_due() {
            self.handle(cue, due, surface);
        }

        self.step_fall(now, surface);

        self.animator.tick(dt, surface);
        if self.phase == Phase::Growth && self.signal.as_ref().and_then(CompletionSignal::take).is_some() {
            self.begin_bloom(surface);
        }

        self.step_shift(now, surface);
        self.bloom.tick(dt, surface);

        if let Some(writer) = self.typewriter.as_mut() {
            let before = writer.visible_text().len();
            writer.tick(dt);
            if writer.visible_text().len() != before {
                surface.set_text(TextSlot::Letter, writer.visible_text());
            }
        }

        self.stream.tick(dt, &mut self.rng, surface);
    }

    fn handle(&mut self, cue: Cue, due: f64, surface: &mut dyn Surface) {
        match cue {
            Cue::BeginFall => {
                let fall = SeedFall::new(self.trigger, surface.viewport(), due, &self.config.drop);
                surface.place_sprite(&fall.sprite(due));
                self.fall = Some(fall);
            }
            Cue::BeginGrowth => self.begin_growth(surface),
            Cue::BeginShift => {
                self.shift_started = Some(due);
                self.clock
                    .schedule_at(due + f64::from(self.config.heart.reveal_delay), Cue::BeginReveal);
            }
            Cue::BeginReveal => self.begin_reveal(due, surface),
            Cue::RefreshTimer => {
                self.refresh_timer(surface);
                self.clock
                    .schedule_at(due + f64::from(self.config.timer_refresh), Cue::RefreshTimer);
            }
        }
    }

    fn enter(&mut self, phase: Phase) {
        log::info!("phase {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    fn step_fall(&mut self, now: f64, surface: &mut dyn Surface) {
        let Some(fall) = self.fall else {
            return;
        };
        if !fall.is_landed(now) {
            surface.place_sprite(&fall.sprite(now));
            return;
        }

        self.fall = None;
        surface.remove_sprite(SEED_ID);
        let viewport = surface.viewport();
        surface.set_ground_line(Some(self.config.drop.ground_y(viewport)));
        self.clock
            .schedule_at(now + f64::from(self.config.drop.settle_delay), Cue::BeginGrowth);
    }

    fn begin_growth(&mut self, surface: &mut dyn Surface) {
        self.enter(Phase::Growth);
        self.cycles += 1;
        self.animator.set_viewport(surface.viewport());

        let (cycle, signal) = CycleContext::new(self.cycles, self.animator.tree());
        match self.animator.start(cycle, surface) {
            Ok(()) => self.signal = Some(signal),
            Err(err) => log::warn!("growth cycle {} not started: {}", self.cycles, err),
        }
    }

    fn begin_bloom(&mut self, surface: &mut dyn Surface) {
        self.enter(Phase::Bloom);
        self.signal = None;

        let heart = &self.config.heart;
        let center = self.animator.trunk_tip() + heart.offset;
        let shape = HeartShape::new(center, heart.scale_x, heart.scale_y);
        self.bloom.place(&shape, &mut self.rng, surface);

        let due = self.clock.now() + f64::from(heart.shift_delay);
        self.clock.schedule_at(due, Cue::BeginShift);
    }

    fn step_shift(&mut self, now: f64, surface: &mut dyn Surface) {
        let Some(started) = self.shift_started else {
            return;
        };
        let duration = self.config.heart.shift_duration;
        let t = if duration > 0.0 {
            ((now - started) as f32 / duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let x = self.config.tree_x_offset * ease(t, Easing::EaseInOut);
        surface.set_scene_offset(Vec2::new(x, 0.0));
        if t >= 1.0 {
            self.shift_started = None;
        }
    }

    fn begin_reveal(&mut self, due: f64, surface: &mut dyn Surface) {
        self.enter(Phase::Reveal);

        self.refresh_timer(surface);
        surface.set_text_visible(TextSlot::Timer, true);
        self.clock
            .schedule_at(due + f64::from(self.config.timer_refresh), Cue::RefreshTimer);

        surface.set_text(TextSlot::Caption, &self.config.caption);
        surface.set_text_visible(TextSlot::Caption, true);

        let writer = Typewriter::new(&self.config.letter, self.config.letter_image);
        surface.set_text_backdrop(TextSlot::Letter, Some(writer.image()));
        self.typewriter = Some(writer);
        surface.set_text(TextSlot::Letter, "");
        surface.set_text_visible(TextSlot::Letter, true);

        self.begin_stream(surface);
    }

    fn begin_stream(&mut self, surface: &mut dyn Surface) {
        self.enter(Phase::Stream);

        let viewport = surface.viewport();
        let anchor = surface
            .anchor_of(TextSlot::Timer)
            .unwrap_or(Vec2::new(60.0, viewport.height - 80.0));
        let source_x = viewport.width / 2.0 + self.config.tree_x_offset;
        let source = Rect::new(
            Vec2::new(source_x - 60.0, viewport.height / 2.0 - 120.0),
            Vec2::new(source_x + 60.0, viewport.height / 2.0 - 60.0),
        );
        let reference_line_y = self.config.drop.ground_y(viewport);

        let target = self.stream.spawn_stream(
            self.config.stream_count,
            source,
            anchor,
            reference_line_y,
            &mut self.rng,
        );
        self.stream_target = Some(target);
    }

    fn refresh_timer(&mut self, surface: &mut dyn Surface) {
        let elapsed = self.timer.breakdown(self.now_ms);
        surface.set_text(TextSlot::Timer, &elapsed.to_string());
    }

    fn clear_cycle(&mut self, surface: &mut dyn Surface) {
        log::info!("restarting from the {} phase", self.phase);
        self.clock.cancel_all();
        self.signal = None;
        self.fall = None;
        self.shift_started = None;
        self.typewriter = None;

        surface.clear_polygons();
        surface.set_scene_offset(Vec2::ZERO);
        self.bloom.clear(surface);
        for slot in TEXT_SLOTS {
            surface.set_text(slot, "");
            surface.set_text_visible(slot, false);
        }
        surface.set_text_backdrop(TextSlot::Letter, None);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Growth cycles started so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn animator(&self) -> &GrowthAnimator {
        &self.animator
    }

    pub fn bloom(&self) -> &BloomField {
        &self.bloom
    }

    pub fn stream(&self) -> &ParticleChoreographer {
        &self.stream
    }

    /// Target of the most recent particle stream
    pub fn stream_target(&self) -> Option<StreamTarget> {
        self.stream_target
    }
}

impl fmt::Debug for PhaseOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseOrchestrator")
            .field("phase", &self.phase)
            .field("cycles", &self.cycles)
            .field("pending_cues", &self.clock.pending())
            .finish()
    }
}

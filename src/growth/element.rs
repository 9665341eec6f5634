//! A single tapering strip: the trunk or one branch

use std::f32::consts::FRAC_PI_2;
use crate::math::{CubicBezier, CurveSample, Vec2};
use crate::render::Viewport;
use super::spec::{GrowthSpec, GrowthTuning, TrunkSpec};

/// Below this span a curve is treated as a point
const DEGENERATE_SPAN: f32 = 1e-4;

/// Lifecycle of a growth element within one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    Pending,
    Growing,
    Complete,
}

/// Stroke width along the strip: `start·(1−t)^exponent + min`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Taper {
    pub start_width: f32,
    pub min_width: f32,
    pub exponent: f32,
}

impl Taper {
    pub fn width(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        self.start_width * (1.0 - t).powf(self.exponent) + self.min_width
    }
}

/// Runtime state of one strip in the growing tree
#[derive(Debug, Clone)]
pub struct GrowthElement {
    /// "trunk" or the branch spec id
    pub id: String,
    /// Index path from the trunk into the spec tree; empty for the trunk
    pub path: Vec<usize>,
    /// 0 for the trunk, 1 for its branches, and so on
    pub depth: usize,
    pub curve: CubicBezier,
    pub taper: Taper,
    pub segments: usize,
    /// Seconds from start to full length
    pub duration: f32,
    pub color: String,
    pub started_at: f32,
    pub progress: f32,
    pub state: ElementState,
}

impl GrowthElement {
    /// The trunk, rooted at the bottom centre of the viewport
    pub fn trunk(spec: &TrunkSpec, viewport: Viewport) -> Self {
        let base = Vec2::new(viewport.width / 2.0, viewport.height - spec.bottom_margin);
        let height = viewport.height * spec.height_fraction;

        let curve = CubicBezier::new(
            base,
            Vec2::new(base.x, base.y - height * spec.straight_fraction),
            Vec2::new(base.x + spec.bend * 0.3, base.y - height * 0.85),
            Vec2::new(base.x + spec.bend, base.y - height),
        );

        Self {
            id: "trunk".to_string(),
            path: Vec::new(),
            depth: 0,
            curve,
            taper: Taper {
                start_width: spec.start_width,
                min_width: spec.tip_width,
                exponent: spec.taper_exponent,
            },
            segments: spec.segments,
            duration: spec.duration,
            color: spec.color.clone(),
            started_at: 0.0,
            progress: 0.0,
            state: ElementState::Pending,
        }
    }

    /// A branch growing out of its parent at `origin`
    pub fn branch(
        spec: &GrowthSpec,
        path: Vec<usize>,
        origin: CurveSample,
        duration: f32,
        tuning: &GrowthTuning,
    ) -> Self {
        let start = origin.position;
        let direction = Vec2::from_angle(origin.angle + spec.angle_radians());
        let length = spec.length;
        let bend = spec.bend;

        let curve = CubicBezier::new(
            start,
            start + direction.scale(length * 0.3),
            start + direction.scale(length * 0.7) + Vec2::new(bend * 0.3, 0.0),
            start + direction.scale(length) + Vec2::new(bend, 0.0),
        );

        Self {
            id: spec.id.clone(),
            depth: path.len(),
            path,
            curve,
            taper: Taper {
                start_width: spec.start_width,
                min_width: tuning.min_width,
                exponent: tuning.taper_exponent,
            },
            segments: tuning.branch_segments,
            duration,
            color: spec.color.clone(),
            started_at: 0.0,
            progress: 0.0,
            state: ElementState::Pending,
        }
    }

    /// Surface key of this element's polygon
    pub fn key(&self) -> String {
        if self.depth == 0 {
            self.id.clone()
        } else {
            format!("branch-{}", self.id)
        }
    }

    pub fn begin(&mut self, at: f32) {
        self.started_at = at;
        self.progress = 0.0;
        self.state = ElementState::Growing;
    }

    /// Zero-length, non-finite curves and non-positive durations finish at once
    pub fn is_degenerate(&self) -> bool {
        if !self.duration.is_finite() || self.duration <= 0.0 || !self.curve.is_finite() {
            return true;
        }
        let c = &self.curve;
        let span = c
            .p0
            .distance(&c.p1)
            .max(c.p0.distance(&c.p2))
            .max(c.p0.distance(&c.p3));
        span < DEGENERATE_SPAN
    }

    /// Recompute progress for clock time `now`. Never moves backwards.
    pub fn advance(&mut self, now: f32) -> f32 {
        let next = if self.is_degenerate() {
            1.0
        } else {
            ((now - self.started_at) / self.duration).clamp(0.0, 1.0)
        };
        self.progress = self.progress.max(next);
        self.progress
    }

    /// Closed outline of the grown part of the strip.
    ///
    /// Samples the curve from the base up to `progress`, offsets each sample
    /// by half the taper width along the normal, and joins the two sides
    /// into one ring: left side base to tip, then right side tip to base.
    pub fn outline(&self, progress: f32) -> Vec<Vec2> {
        let segments = self.segments.max(1);
        let last = ((segments as f32 * progress.clamp(0.0, 1.0)).floor() as usize).min(segments);

        let mut left = Vec::with_capacity(2 * (last + 1));
        let mut right = Vec::with_capacity(last + 1);

        for i in 0..=last {
            let t = i as f32 / segments as f32;
            let sample = self.curve.evaluate(t);
            let half = self.taper.width(t) / 2.0;
            let normal = Vec2::from_angle(sample.angle + FRAC_PI_2);

            left.push(sample.position + normal.scale(half));
            right.push(sample.position - normal.scale(half));
        }

        right.reverse();
        left.extend(right);
        left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 900.0)
    }

    fn vertical_origin() -> CurveSample {
        CurveSample {
            position: Vec2::new(100.0, 100.0),
            angle: -FRAC_PI_2,
        }
    }

    #[test]
    fn test_taper_never_zero() {
        let taper = Taper { start_width: 15.0, min_width: 4.0, exponent: 1.5 };
        assert_eq!(taper.width(0.0), 19.0);
        assert_eq!(taper.width(1.0), 4.0);
        assert!(taper.width(0.5) > 4.0 && taper.width(0.5) < 19.0);
    }

    #[test]
    fn test_trunk_geometry() {
        let trunk = GrowthElement::trunk(&TrunkSpec::default(), viewport());
        assert_eq!(trunk.curve.p0, Vec2::new(400.0, 830.0));
        assert!((trunk.curve.p3.x - 340.0).abs() < 0.001);
        assert!((trunk.curve.p3.y - 230.0).abs() < 0.001);
        assert_eq!(trunk.key(), "trunk");
    }

    #[test]
    fn test_branch_follows_parent_tangent() {
        let spec = GrowthSpec::new("b", 50.0, 100.0, 10.0);
        let branch = GrowthElement::branch(&spec, vec![0], vertical_origin(), 1.0, &GrowthTuning::default());
        // No angular offset and no bend: straight up
        assert!((branch.curve.p3.x - 100.0).abs() < 0.001);
        assert!((branch.curve.p3.y - 0.0).abs() < 0.001);
        assert_eq!(branch.depth, 1);
        assert_eq!(branch.key(), "branch-b");
    }

    #[test]
    fn test_branch_angle_and_bend() {
        let spec = GrowthSpec::new("b", 50.0, 100.0, 10.0).with_angle(90.0).with_bend(20.0);
        let branch = GrowthElement::branch(&spec, vec![0], vertical_origin(), 1.0, &GrowthTuning::default());
        // -90° + 90° points along +x
        assert!((branch.curve.p3.x - 220.0).abs() < 0.001);
        assert!((branch.curve.p3.y - 100.0).abs() < 0.001);
        assert!((branch.curve.p2.x - 176.0).abs() < 0.001);
    }

    #[test]
    fn test_outline_vertex_count() {
        let mut trunk = GrowthElement::trunk(&TrunkSpec::default(), viewport());
        trunk.begin(0.0);
        assert_eq!(trunk.outline(0.0).len(), 2);
        assert_eq!(trunk.outline(0.5).len(), 2 * 31);
        assert_eq!(trunk.outline(1.0).len(), 2 * 61);
    }

    #[test]
    fn test_outline_is_symmetric_about_curve() {
        let spec = GrowthSpec::new("b", 50.0, 100.0, 10.0);
        let branch = GrowthElement::branch(&spec, vec![0], vertical_origin(), 1.0, &GrowthTuning::default());
        let outline = branch.outline(1.0);
        let n = outline.len();
        // Base corners sit half the base width either side of the origin
        let base_width = outline[0].distance(&outline[n - 1]);
        assert!((base_width - 14.0).abs() < 0.001);
        let tip_width = outline[n / 2 - 1].distance(&outline[n / 2]);
        assert!((tip_width - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_from_elapsed() {
        let mut trunk = GrowthElement::trunk(&TrunkSpec::default(), viewport());
        trunk.begin(1.0);
        assert!((trunk.advance(1.75) - 0.5).abs() < 0.0001);
        assert_eq!(trunk.advance(10.0), 1.0);
        assert_eq!(trunk.advance(1.2), 1.0, "progress never decreases");
    }

    #[test]
    fn test_degenerate_completes_immediately() {
        let spec = GrowthSpec::new("dot", 50.0, 0.0, 3.0);
        let mut branch = GrowthElement::branch(&spec, vec![0], vertical_origin(), 1.0, &GrowthTuning::default());
        assert!(branch.is_degenerate());
        branch.begin(0.0);
        assert_eq!(branch.advance(0.0), 1.0);

        let spec = GrowthSpec::new("instant", 50.0, 40.0, 3.0);
        let mut branch = GrowthElement::branch(&spec, vec![0], vertical_origin(), 0.0, &GrowthTuning::default());
        branch.begin(0.0);
        assert_eq!(branch.advance(0.0), 1.0);
    }
}

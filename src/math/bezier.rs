use super::Vec2;

/// Position and tangent direction sampled from a curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    pub position: Vec2,
    /// Tangent angle in radians, `atan2` of the derivative
    pub angle: f32,
}

/// Cubic Bézier curve through four control points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl CubicBezier {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluate position and tangent angle at `t` (clamped to [0, 1])
    pub fn evaluate(&self, t: f32) -> CurveSample {
        evaluate(t, self.p0, self.p1, self.p2, self.p3)
    }

    pub fn is_finite(&self) -> bool {
        self.p0.is_finite() && self.p1.is_finite() && self.p2.is_finite() && self.p3.is_finite()
    }
}

/// Evaluate a cubic Bézier at `t` using the Bernstein blend
pub fn evaluate(t: f32, p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> CurveSample {
    let t = t.clamp(0.0, 1.0);
    let u = 1.0 - t;

    let b0 = u * u * u;
    let b1 = 3.0 * u * u * t;
    let b2 = 3.0 * u * t * t;
    let b3 = t * t * t;
    let position = p0.scale(b0) + p1.scale(b1) + p2.scale(b2) + p3.scale(b3);

    let derivative = (p1 - p0).scale(3.0 * u * u)
        + (p2 - p1).scale(6.0 * u * t)
        + (p3 - p2).scale(3.0 * t * t);

    CurveSample {
        position,
        angle: derivative.y.atan2(derivative.x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn sample_curves() -> Vec<CubicBezier> {
        vec![
            CubicBezier::new(
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(20.0, 5.0),
                Vec2::new(30.0, 30.0),
            ),
            CubicBezier::new(
                Vec2::new(400.0, 730.0),
                Vec2::new(400.0, 394.0),
                Vec2::new(382.0, 322.0),
                Vec2::new(340.0, 250.0),
            ),
            CubicBezier::new(
                Vec2::new(-5.0, 2.0),
                Vec2::new(-5.0, 2.0),
                Vec2::new(-5.0, 2.0),
                Vec2::new(-5.0, 2.0),
            ),
        ]
    }

    #[test]
    fn test_endpoints() {
        for curve in sample_curves() {
            let start = curve.evaluate(0.0).position;
            let end = curve.evaluate(1.0).position;
            assert!(start.distance(&curve.p0) < 0.0001);
            assert!(end.distance(&curve.p3) < 0.001);
        }
    }

    #[test]
    fn test_clamps_parameter() {
        let curve = sample_curves()[0];
        assert_eq!(curve.evaluate(-1.0), curve.evaluate(0.0));
        assert_eq!(curve.evaluate(2.0), curve.evaluate(1.0));
    }

    #[test]
    fn test_straight_line_tangent() {
        let curve = CubicBezier::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(0.0, 20.0),
            Vec2::new(0.0, 30.0),
        );
        let mid = curve.evaluate(0.5);
        assert!((mid.position.y - 15.0).abs() < 0.0001);
        assert!((mid.angle - FRAC_PI_2).abs() < 0.0001);
    }

    #[test]
    fn test_upward_trunk_tangent() {
        // y grows downward, so a trunk growing up points at -pi/2
        let curve = CubicBezier::new(
            Vec2::new(0.0, 100.0),
            Vec2::new(0.0, 60.0),
            Vec2::new(0.0, 30.0),
            Vec2::new(0.0, 0.0),
        );
        assert!((curve.evaluate(0.0).angle + FRAC_PI_2).abs() < 0.0001);
    }

    #[test]
    fn test_free_function_matches_method() {
        let c = sample_curves()[1];
        assert_eq!(evaluate(0.3, c.p0, c.p1, c.p2, c.p3), c.evaluate(0.3));
    }
}

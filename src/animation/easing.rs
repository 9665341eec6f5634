//! Easing functions for smooth animations

/// Easing function types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Easing {
    /// Linear interpolation (growth and particle paths)
    #[default]
    Linear,
    /// Slow start, accelerate
    EaseIn,
    /// Fast start, decelerate (bloom fade-in)
    EaseOut,
    /// Smooth ease-in-out (scene shift)
    EaseInOut,
    /// Hermite smoothstep `t²(3 − 2t)` (the seed drop)
    Smoothstep,
    /// Overshoot at the end
    EaseOutBack,
    /// Anticipate, then overshoot (bloom pop-in)
    EaseInOutBack,
}

/// Apply easing function to a value t in range [0, 1]
pub fn ease(t: f32, easing: Easing) -> f32 {
    let t = t.clamp(0.0, 1.0);

    match easing {
        Easing::Linear => t,
        Easing::EaseIn => t * t,
        Easing::EaseOut => 1.0 - (1.0 - t).powi(2),
        Easing::EaseInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
            }
        }
        Easing::Smoothstep => t * t * (3.0 - 2.0 * t),
        Easing::EaseOutBack => {
            let c1 = 1.70158;
            let c3 = c1 + 1.0;
            1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
        }
        Easing::EaseInOutBack => {
            let c2 = 1.70158 * 1.525;
            if t < 0.5 {
                (2.0 * t).powi(2) * ((c2 + 1.0) * 2.0 * t - c2) / 2.0
            } else {
                ((2.0 * t - 2.0).powi(2) * ((c2 + 1.0) * (t * 2.0 - 2.0) + c2) + 2.0) / 2.0
            }
        }
    }
}

//! Recursive tree growth
//!
//! An immutable [`TreeSpec`] describes the trunk and the branch hierarchy.
//! [`GrowthAnimator`] grows it one cycle at a time, and each cycle owns a
//! [`CycleContext`] holding its completion barrier and visited set.

pub mod animator;
pub mod barrier;
pub mod element;
pub mod spec;

pub use animator::GrowthAnimator;
pub use barrier::{CompletionBarrier, CompletionSignal, CycleContext};
pub use element::{ElementState, GrowthElement, Taper};
pub use spec::{GrowthSpec, GrowthTuning, TreeSpec, TrunkSpec};

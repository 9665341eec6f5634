//! Drives the trunk and every branch through one growth cycle
//!
//! Each tick advances the animator clock, starts children whose spawn time
//! has come, then steps every growing element in activation order. A parent
//! therefore always writes its outline before any child it spawned is
//! stepped. A parent schedules a child the first time its progress reaches
//! the child's attachment fraction; the cycle's visited set guarantees that
//! happens once per cycle.

use std::collections::HashMap;
use crate::animation::Timeline;
use crate::error::PhaseError;
use crate::math::{CurveSample, Vec2};
use crate::render::{Surface, Viewport};
use super::barrier::CycleContext;
use super::element::{ElementState, GrowthElement};
use super::spec::{GrowthSpec, TreeSpec};

/// A child branch waiting for its start time
#[derive(Debug, Clone)]
struct PendingChild {
    path: Vec<usize>,
    origin: CurveSample,
    duration: f32,
}

/// Growth state machine for one tree
#[derive(Debug)]
pub struct GrowthAnimator {
    tree: TreeSpec,
    viewport: Viewport,
    clock: Timeline<PendingChild>,
    elements: Vec<GrowthElement>,
    cycle: Option<CycleContext>,
    spawn_counts: HashMap<String, usize>,
}

impl GrowthAnimator {
    pub fn new(tree: TreeSpec, viewport: Viewport) -> Self {
        Self {
            tree,
            viewport,
            clock: Timeline::new(),
            elements: Vec::new(),
            cycle: None,
            spawn_counts: HashMap::new(),
        }
    }

    pub fn tree(&self) -> &TreeSpec {
        &self.tree
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Begin a cycle: clear the previous tree and start the trunk.
    ///
    /// Refused while the previous cycle's barrier is still pending.
    pub fn start(&mut self, cycle: CycleContext, surface: &mut dyn Surface) -> Result<(), PhaseError> {
        if self.is_running() {
            log::warn!("growth cycle requested while cycle {} is still running", self.cycle_id().unwrap_or(0));
            return Err(PhaseError::CycleInProgress { phase: "growth" });
        }

        log::info!(
            "starting growth cycle {} with {} elements",
            cycle.id(),
            cycle.barrier().total()
        );

        surface.clear_polygons();
        self.clock = Timeline::new();
        self.elements.clear();
        self.spawn_counts.clear();

        let mut trunk = GrowthElement::trunk(&self.tree.trunk, self.viewport);
        trunk.begin(0.0);
        self.elements.push(trunk);
        self.cycle = Some(cycle);
        Ok(())
    }

    /// Advance by `dt` seconds and redraw every growing element
    pub fn tick(&mut self, dt: f32, surface: &mut dyn Surface) {
        if self.cycle.is_none() {
            return;
        }

        // the clock restarts with every cycle, so element times fit in f32
        let now = self.clock.advance(dt) as f32;
        for (due, pending) in self.clock.drain_due() {
            self.activate(due as f32, pending);
        }

        for index in 0..self.elements.len() {
            self.step(index, now, surface);
        }
    }

    fn activate(&mut self, at: f32, pending: PendingChild) {
        let Some(spec) = spec_at(&self.tree.branches, &pending.path) else {
            return;
        };
        let mut element = GrowthElement::branch(
            spec,
            pending.path,
            pending.origin,
            pending.duration,
            &self.tree.tuning,
        );
        element.begin(at);
        log::debug!("branch {} starts growing at {:.3}s", element.id, at);
        self.elements.push(element);
    }

    fn step(&mut self, index: usize, now: f32, surface: &mut dyn Surface) {
        let element = &mut self.elements[index];
        if element.state != ElementState::Growing {
            return;
        }

        let progress = element.advance(now);
        surface.set_polygon(&element.key(), &element.outline(progress), &element.color);

        let Some(cycle) = self.cycle.as_mut() else {
            return;
        };

        let children = children_at(&self.tree.branches, &element.path);
        let tuning = &self.tree.tuning;
        for (child_index, child) in children.iter().enumerate() {
            let attachment = child.attachment();
            if progress < attachment || !cycle.mark_drawn(&child.id) {
                continue;
            }

            let mut path = element.path.clone();
            path.push(child_index);
            let pending = PendingChild {
                path,
                origin: element.curve.evaluate(attachment),
                duration: element.duration * tuning.duration_factor(element.depth),
            };
            self.clock
                .schedule_at(f64::from(now + tuning.spawn_lag(element.depth)), pending);
            *self.spawn_counts.entry(child.id.clone()).or_insert(0) += 1;
            log::debug!("{} crossed {:.2}, scheduling {}", element.id, attachment, child.id);
        }

        if progress >= 1.0 {
            element.state = ElementState::Complete;
            if cycle.arrive(now) {
                log::info!("growth cycle {} complete at {:.3}s", cycle.id(), now);
            }
        }
    }

    /// A cycle has started and its barrier has not resolved
    pub fn is_running(&self) -> bool {
        self.cycle.as_ref().is_some_and(|c| !c.is_complete())
    }

    pub fn is_idle(&self) -> bool {
        !self.is_running()
    }

    pub fn cycle_id(&self) -> Option<u64> {
        self.cycle.as_ref().map(CycleContext::id)
    }

    pub fn cycle(&self) -> Option<&CycleContext> {
        self.cycle.as_ref()
    }

    /// State of an element in the current cycle ("trunk" or a branch id)
    pub fn element_state(&self, id: &str) -> ElementState {
        self.elements
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.state)
            .unwrap_or(ElementState::Pending)
    }

    pub fn elements(&self) -> &[GrowthElement] {
        &self.elements
    }

    /// How many times a branch was spawned in the current cycle
    pub fn spawn_count(&self, id: &str) -> usize {
        self.spawn_counts.get(id).copied().unwrap_or(0)
    }

    /// Where the trunk ends for the current viewport
    pub fn trunk_tip(&self) -> Vec2 {
        GrowthElement::trunk(&self.tree.trunk, self.viewport).curve.p3
    }
}

fn spec_at<'a>(branches: &'a [GrowthSpec], path: &[usize]) -> Option<&'a GrowthSpec> {
    let (first, rest) = path.split_first()?;
    let mut spec = branches.get(*first)?;
    for index in rest {
        spec = spec.children.get(*index)?;
    }
    Some(spec)
}

fn children_at<'a>(branches: &'a [GrowthSpec], path: &[usize]) -> &'a [GrowthSpec] {
    if path.is_empty() {
        return branches;
    }
    spec_at(branches, path)
        .map(|s| s.children.as_slice())
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use crate::render::RecordingSurface;

    const FRAME: f32 = 1.0 / 60.0;

    fn surface() -> RecordingSurface {
        RecordingSurface::new(800.0, 900.0)
    }

    fn run_to_completion(animator: &mut GrowthAnimator, surface: &mut RecordingSurface) -> usize {
        let mut frames = 0;
        while animator.is_running() {
            animator.tick(FRAME, surface);
            frames += 1;
            assert!(frames < 10_000, "growth never finished");
        }
        frames
    }

    #[test]
    fn test_barrier_fires_once_after_all_elements() {
        let tree = TreeSpec::default();
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let (cycle, signal) = CycleContext::new(1, &tree);
        let cycle = cycle.with_callback(move || counter.set(counter.get() + 1));
        assert_eq!(cycle.barrier().total(), 12);

        let mut surface = surface();
        let mut animator = GrowthAnimator::new(tree.clone(), surface.viewport());
        animator.start(cycle, &mut surface).unwrap();
        run_to_completion(&mut animator, &mut surface);

        assert_eq!(fired.get(), 1);
        assert!(signal.take().is_some());
        let complete = animator
            .elements()
            .iter()
            .filter(|e| e.state == ElementState::Complete)
            .count();
        assert_eq!(complete, 12);

        // Extra ticks do not fire again
        for _ in 0..30 {
            animator.tick(FRAME, &mut surface);
        }
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_every_branch_spawns_exactly_once() {
        let tree = TreeSpec::default();
        let mut surface = surface();
        let mut animator = GrowthAnimator::new(tree.clone(), surface.viewport());
        let (cycle, _) = CycleContext::new(1, &tree);
        animator.start(cycle, &mut surface).unwrap();
        run_to_completion(&mut animator, &mut surface);

        for spec in tree.iter_preorder() {
            assert_eq!(animator.spawn_count(&spec.id), 1, "{} spawned wrong number of times", spec.id);
            assert!(surface.polygon(&format!("branch-{}", spec.id)).is_some());
        }
        assert!(surface.polygon("trunk").is_some());
    }

    #[test]
    fn test_restart_respawns_every_branch() {
        let tree = TreeSpec::default();
        let mut surface = surface();
        let mut animator = GrowthAnimator::new(tree.clone(), surface.viewport());

        for cycle_id in 1..=2 {
            let (cycle, signal) = CycleContext::new(cycle_id, &tree);
            animator.start(cycle, &mut surface).unwrap();
            assert!(tree
                .iter_preorder()
                .all(|s| !animator.cycle().unwrap().is_drawn(&s.id)));
            run_to_completion(&mut animator, &mut surface);
            assert!(signal.is_resolved());
            for spec in tree.iter_preorder() {
                assert_eq!(animator.spawn_count(&spec.id), 1);
            }
        }
    }

    #[test]
    fn test_refuses_overlapping_cycle() {
        let tree = TreeSpec::default();
        let mut surface = surface();
        let mut animator = GrowthAnimator::new(tree.clone(), surface.viewport());
        let (first, first_signal) = CycleContext::new(1, &tree);
        animator.start(first, &mut surface).unwrap();
        animator.tick(0.2, &mut surface);

        let (second, _) = CycleContext::new(2, &tree);
        assert_eq!(
            animator.start(second, &mut surface),
            Err(PhaseError::CycleInProgress { phase: "growth" })
        );
        assert_eq!(animator.cycle_id(), Some(1));

        run_to_completion(&mut animator, &mut surface);
        assert!(first_signal.is_resolved());
    }

    #[test]
    fn test_parent_drawn_before_child() {
        let tree = TreeSpec::default();
        let mut surface = surface();
        let mut animator = GrowthAnimator::new(tree.clone(), surface.viewport());
        let (cycle, _) = CycleContext::new(1, &tree);
        animator.start(cycle, &mut surface).unwrap();
        run_to_completion(&mut animator, &mut surface);

        let first_write = |key: &str| surface.polygon_writes.iter().position(|k| k == key).unwrap();
        assert!(first_write("trunk") < first_write("branch-b1"));
        assert!(first_write("branch-b1") < first_write("branch-b1small1"));
        assert!(first_write("branch-b4") < first_write("branch-b4small1"));
    }

    #[test]
    fn test_child_starts_at_parent_curve() {
        let tree = TreeSpec::default();
        let mut surface = surface();
        let mut animator = GrowthAnimator::new(tree.clone(), surface.viewport());
        let (cycle, _) = CycleContext::new(1, &tree);
        animator.start(cycle, &mut surface).unwrap();
        run_to_completion(&mut animator, &mut surface);

        let trunk = &animator.elements()[0];
        let b2 = animator.elements().iter().find(|e| e.id == "b2").unwrap();
        let attach = trunk.curve.evaluate(0.5);
        assert!(b2.curve.p0.distance(&attach.position) < 0.001);
        assert!((b2.duration - 1.5 * 0.8).abs() < 0.0001);

        let twig = animator.elements().iter().find(|e| e.id == "b2small1").unwrap();
        assert!((twig.duration - 1.5 * 0.8 * 0.7).abs() < 0.0001);
        assert_eq!(twig.depth, 2);
    }

    #[test]
    fn test_zero_duration_tree_completes_immediately() {
        let mut tree = TreeSpec::default();
        tree.trunk.duration = 0.0;
        tree.tuning.trunk_child_lag = 0.0;
        tree.tuning.nested_child_lag = 0.0;
        let mut surface = surface();
        let mut animator = GrowthAnimator::new(tree.clone(), surface.viewport());
        let (cycle, signal) = CycleContext::new(1, &tree);
        animator.start(cycle, &mut surface).unwrap();

        // Trunk, then first-level branches, then twigs: one frame per level
        let frames = run_to_completion(&mut animator, &mut surface);
        assert_eq!(frames, 3);
        assert!(signal.is_resolved());
    }

    #[test]
    fn test_deep_nesting() {
        let tree = TreeSpec {
            branches: vec![GrowthSpec::new("a", 50.0, 60.0, 4.0).with_children(vec![
                GrowthSpec::new("b", 50.0, 30.0, 3.0)
                    .with_children(vec![GrowthSpec::new("c", 100.0, 10.0, 1.0)]),
            ])],
            ..TreeSpec::default()
        };
        let mut surface = surface();
        let mut animator = GrowthAnimator::new(tree.clone(), surface.viewport());
        let (cycle, signal) = CycleContext::new(1, &tree);
        assert_eq!(cycle.barrier().total(), 4);
        animator.start(cycle, &mut surface).unwrap();
        run_to_completion(&mut animator, &mut surface);

        assert!(signal.is_resolved());
        assert_eq!(animator.element_state("c"), ElementState::Complete);
        assert_eq!(animator.spawn_count("c"), 1);
    }

    #[test]
    fn test_polygon_replaced_in_place() {
        let tree = TreeSpec::default();
        let mut surface = surface();
        let mut animator = GrowthAnimator::new(tree.clone(), surface.viewport());
        let (cycle, _) = CycleContext::new(1, &tree);
        animator.start(cycle, &mut surface).unwrap();

        animator.tick(0.3, &mut surface);
        let early = surface.polygon("trunk").unwrap().len();
        animator.tick(0.3, &mut surface);
        let later = surface.polygon("trunk").unwrap().len();
        assert!(later > early);
        assert_eq!(surface.polygons.len(), 1);
    }
}

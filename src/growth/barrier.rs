//! Completion barrier for one growth cycle
//!
//! Each growth element arrives exactly once when it finishes. The last
//! arrival resolves a one-shot signal and runs the completion callback.
//! A new cycle builds a new context; nothing carries over between cycles.

use std::cell::Cell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use super::spec::TreeSpec;

/// Receiving half of the barrier: resolves once, with the clock time of the last arrival
#[derive(Debug, Clone)]
pub struct CompletionSignal {
    slot: Rc<Cell<Option<f32>>>,
    taken: Rc<Cell<bool>>,
}

impl CompletionSignal {
    pub fn is_resolved(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Returns the completion time the first time it is called after resolution
    pub fn take(&self) -> Option<f32> {
        if self.taken.get() {
            return None;
        }
        let at = self.slot.get()?;
        self.taken.set(true);
        Some(at)
    }
}

/// Counter gating a one-shot completion
pub struct CompletionBarrier {
    total: usize,
    remaining: usize,
    slot: Rc<Cell<Option<f32>>>,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl fmt::Debug for CompletionBarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionBarrier")
            .field("total", &self.total)
            .field("remaining", &self.remaining)
            .field("resolved", &self.slot.get().is_some())
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

impl CompletionBarrier {
    /// Barrier expecting `total` arrivals. A zero-sized barrier is resolved from the start.
    pub fn new(total: usize) -> (Self, CompletionSignal) {
        let slot = Rc::new(Cell::new(if total == 0 { Some(0.0) } else { None }));
        let signal = CompletionSignal {
            slot: Rc::clone(&slot),
            taken: Rc::new(Cell::new(false)),
        };
        let barrier = Self {
            total,
            remaining: total,
            slot,
            on_complete: None,
        };
        (barrier, signal)
    }

    /// Run `callback` once when the barrier resolves
    pub fn set_callback(&mut self, callback: impl FnOnce() + 'static) {
        if self.is_resolved() {
            callback();
        } else {
            self.on_complete = Some(Box::new(callback));
        }
    }

    /// Record one finished element. Returns true only for the arrival that resolves the barrier.
    pub fn arrive(&mut self, at: f32) -> bool {
        if self.remaining == 0 {
            log::warn!("growth barrier received an arrival after resolving; ignored");
            return false;
        }

        self.remaining -= 1;
        if self.remaining > 0 {
            return false;
        }

        self.slot.set(Some(at));
        if let Some(callback) = self.on_complete.take() {
            callback();
        }
        true
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_resolved(&self) -> bool {
        self.remaining == 0
    }
}

/// Per-cycle state: the barrier plus which specs have already started
#[derive(Debug)]
pub struct CycleContext {
    id: u64,
    barrier: CompletionBarrier,
    drawn: HashSet<String>,
}

impl CycleContext {
    /// Fresh context sized for `tree`: every branch plus the trunk
    pub fn new(id: u64, tree: &TreeSpec) -> (Self, CompletionSignal) {
        let (barrier, signal) = CompletionBarrier::new(tree.element_count());
        let context = Self {
            id,
            barrier,
            drawn: HashSet::new(),
        };
        (context, signal)
    }

    pub fn with_callback(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.barrier.set_callback(callback);
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Mark a spec as started. Returns false if it already started this cycle.
    pub fn mark_drawn(&mut self, spec_id: &str) -> bool {
        self.drawn.insert(spec_id.to_string())
    }

    pub fn is_drawn(&self, spec_id: &str) -> bool {
        self.drawn.contains(spec_id)
    }

    pub fn drawn_count(&self) -> usize {
        self.drawn.len()
    }

    pub fn arrive(&mut self, at: f32) -> bool {
        self.barrier.arrive(at)
    }

    pub fn barrier(&self) -> &CompletionBarrier {
        &self.barrier
    }

    pub fn is_complete(&self) -> bool {
        self.barrier.is_resolved()
    }
}

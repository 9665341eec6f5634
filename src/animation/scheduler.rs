//! Frame-clock task queue
//!
//! Everything in the scene advances from one `tick(dt)` per display frame.
//! Work that must happen later (a child branch starting after its parent
//! crosses the attachment point, a particle's staggered launch, a pause
//! between phases) is scheduled here at an absolute clock time and drained
//! once the clock reaches it.
//!
//! The clock counts in f64 seconds so a page left open for weeks still
//! advances by a single frame.

/// Handle for a scheduled task, usable for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    id: TaskId,
    due: f64,
    task: T,
}

/// Ordered queue of tasks keyed by due time on a monotonic clock
#[derive(Debug, Clone)]
pub struct Timeline<T> {
    now: f64,
    next_id: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Current clock time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Advance the clock; negative or non-finite steps are ignored
    pub fn advance(&mut self, dt: f32) -> f64 {
        if dt.is_finite() && dt > 0.0 {
            self.now += f64::from(dt);
        }
        self.now
    }

    /// Schedule `task` at absolute time `due`
    pub fn schedule_at(&mut self, due: f64, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;

        // Keep sorted by due time; equal due times keep insertion order
        let index = self.pending.partition_point(|s| s.due <= due);
        self.pending.insert(index, Scheduled { id, due, task });
        id
    }

    /// Schedule `task` `delay` seconds from now
    pub fn schedule_in(&mut self, delay: f32, task: T) -> TaskId {
        let due = self.now + f64::from(delay.max(0.0));
        self.schedule_at(due, task)
    }

    /// Drop a pending task. Returns false if it already ran or never existed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    /// Drop every pending task
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Remove and return every task due at or before the current time, in due order.
    /// Each entry carries its due time so callers can account for overshoot.
    pub fn drain_due(&mut self) -> Vec<(f64, T)> {
        let split = self.pending.partition_point(|s| s.due <= self.now);
        self.pending
            .drain(..split)
            .map(|s| (s.due, s.task))
            .collect()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

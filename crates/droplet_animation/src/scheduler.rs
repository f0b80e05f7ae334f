//! Animation scheduler
//!
//! Tracks timed animation blocks and runs their completion callbacks once
//! they finish. The scheduler does not interpolate values itself: whoever
//! started the block has already handed target values to the renderer.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

use crate::easing::Easing;

new_key_type! {
    pub struct AnimationId;
}

/// Callback run once when a block finishes
pub type Completion = Box<dyn FnOnce()>;

/// Scheduler shared by the widgets of one UI context
pub type SharedScheduler = Rc<RefCell<AnimationScheduler>>;

/// Duration, begin delay and curve of an animation block
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    pub duration_ms: f32,
    pub delay_ms: f32,
    pub easing: Easing,
}

impl Timing {
    /// Block with the platform's default ease-in-out curve
    pub fn new(duration_ms: f32) -> Self {
        Self {
            duration_ms: duration_ms.max(0.0),
            delay_ms: 0.0,
            easing: Easing::EaseInOut,
        }
    }

    pub fn with_delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms.max(0.0);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn total_ms(&self) -> f32 {
        self.delay_ms + self.duration_ms
    }

    /// Eased progress after `elapsed_ms`
    pub fn progress_at(&self, elapsed_ms: f32) -> f32 {
        if self.duration_ms <= 0.0 {
            return if elapsed_ms >= self.delay_ms { 1.0 } else { 0.0 };
        }
        let local = ((elapsed_ms - self.delay_ms) / self.duration_ms).clamp(0.0, 1.0);
        self.easing.apply(local)
    }
}

struct ScheduledBlock {
    timing: Timing,
    elapsed_ms: f32,
    completion: Option<Completion>,
}

/// The animation scheduler that ticks all active blocks
#[derive(Default)]
pub struct AnimationScheduler {
    blocks: SlotMap<AnimationId, ScheduledBlock>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scheduler ready to be shared between widgets
    pub fn shared() -> SharedScheduler {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Start a block; `completion` runs after `timing.total_ms()` has elapsed
    pub fn schedule<F: FnOnce() + 'static>(&mut self, timing: Timing, completion: F) -> AnimationId {
        self.blocks.insert(ScheduledBlock {
            timing,
            elapsed_ms: 0.0,
            completion: Some(Box::new(completion)),
        })
    }

    /// Eased progress of a running block
    pub fn progress(&self, id: AnimationId) -> Option<f32> {
        self.blocks
            .get(id)
            .map(|block| block.timing.progress_at(block.elapsed_ms))
    }

    pub fn is_active(&self, id: AnimationId) -> bool {
        self.blocks.contains_key(id)
    }

    /// Drop a block without running its completion
    pub fn cancel(&mut self, id: AnimationId) -> bool {
        self.blocks.remove(id).is_some()
    }

    /// Advance every block and hand back the completions that became due.
    ///
    /// Completions are returned instead of run so callers can release their
    /// borrow of the scheduler first; see [`drive`].
    pub fn tick(&mut self, dt_ms: f32) -> Vec<Completion> {
        let mut finished = Vec::new();
        for (id, block) in self.blocks.iter_mut() {
            block.elapsed_ms += dt_ms;
            if block.elapsed_ms >= block.timing.total_ms() {
                finished.push(id);
            }
        }

        finished
            .into_iter()
            .filter_map(|id| self.blocks.remove(id))
            .filter_map(|block| block.completion)
            .collect()
    }

    /// Check if any blocks are still running
    pub fn has_active_animations(&self) -> bool {
        !self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Advance a shared scheduler by one frame and run the completions that
/// became due. Returns how many completions ran.
pub fn drive(scheduler: &SharedScheduler, dt_ms: f32) -> usize {
    let completions = scheduler.borrow_mut().tick(dt_ms);
    let count = completions.len();
    if count > 0 {
        tracing::trace!(count, "running animation completions");
    }
    for completion in completions {
        completion();
    }
    count
}

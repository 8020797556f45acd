//! Busy marks for running generations.
//!
//! A stack stays busy while its [`StackMark`] lives and a batch stays running
//! while its [`BatchMark`] lives. Marks release on drop, so a cancelled or
//! panicking generation clears its own. The mutex is only held for counter
//! updates.

use crate::{BatchClock, BatchProgress};
use promptcanvas_core::StackId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Default)]
struct TrackerState {
    generating: HashMap<StackId, usize>,
    batch: BatchClock,
}

/// Shared per-stack and batch busy state.
#[derive(Debug, Clone, Default)]
pub(crate) struct GenerationTracker {
    state: Arc<Mutex<TrackerState>>,
}

impl GenerationTracker {
    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks `stack` busy until the returned mark drops. Marks nest.
    pub(crate) fn mark_stack(&self, stack: StackId) -> StackMark {
        *self.lock().generating.entry(stack).or_default() += 1;
        StackMark {
            tracker: self.clone(),
            stack,
        }
    }

    /// Starts the batch clock until the returned mark drops or finishes.
    pub(crate) fn mark_batch(&self) -> BatchMark {
        self.lock().batch.start();
        BatchMark {
            tracker: self.clone(),
            finished: false,
        }
    }

    pub(crate) fn is_generating(&self, stack: StackId) -> bool {
        self.lock().generating.contains_key(&stack)
    }

    pub(crate) fn batch_progress(&self) -> BatchProgress {
        self.lock().batch.progress()
    }

    fn release_stack(&self, stack: StackId) {
        let mut state = self.lock();
        if let Some(count) = state.generating.get_mut(&stack) {
            *count -= 1;
            if *count == 0 {
                state.generating.remove(&stack);
            }
        }
    }
}

/// Busy mark on one stack.
#[derive(Debug)]
pub(crate) struct StackMark {
    tracker: GenerationTracker,
    stack: StackId,
}

impl Drop for StackMark {
    fn drop(&mut self) {
        self.tracker.release_stack(self.stack);
    }
}

/// Running mark on the batch clock.
#[derive(Debug)]
pub(crate) struct BatchMark {
    tracker: GenerationTracker,
    finished: bool,
}

impl BatchMark {
    /// Stops the clock, returning the total once the last overlapping batch
    /// stops.
    pub(crate) fn finish(mut self) -> Option<Duration> {
        self.finished = true;
        self.tracker.lock().batch.stop()
    }
}

impl Drop for BatchMark {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Some(elapsed) = self.tracker.lock().batch.stop() {
            debug!(elapsed_ms = crate::elapsed_millis(elapsed), "Batch abandoned");
        }
    }
}

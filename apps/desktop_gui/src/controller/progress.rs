//! Latest swap and a bounded swap history, written by the sort task and read
//! by the UI each frame. Replaces per-swap channel events so a stalled UI
//! never backs up the event queue.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard},
};

use sort_core::SwapProgress;

pub const HISTORY_CAPACITY: usize = 200;

#[derive(Debug)]
struct ProgressLog {
    total_comparisons: u64,
    history: VecDeque<SwapProgress>,
    capacity: usize,
}

#[derive(Debug, Clone)]
pub struct SharedProgress {
    inner: Arc<Mutex<ProgressLog>>,
}

impl Default for SharedProgress {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl SharedProgress {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ProgressLog {
                total_comparisons: 0,
                history: VecDeque::with_capacity(capacity),
                capacity: capacity.max(1),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProgressLog> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Clears the history for a new sort.
    pub fn begin(&self, total_comparisons: u64) {
        let mut log = self.lock();
        log.total_comparisons = total_comparisons;
        log.history.clear();
    }

    pub fn record(&self, progress: SwapProgress) {
        let mut log = self.lock();
        if log.history.len() == log.capacity {
            log.history.pop_front();
        }
        log.history.push_back(progress);
    }

    pub fn latest(&self) -> Option<SwapProgress> {
        self.lock().history.back().copied()
    }

    pub fn total_comparisons(&self) -> u64 {
        self.lock().total_comparisons
    }

    /// Newest first.
    pub fn history(&self) -> Vec<SwapProgress> {
        self.lock().history.iter().rev().copied().collect()
    }
}

pub fn history_line(progress: &SwapProgress) -> String {
    format!(
        "#{} pass {}: swap({},{}) -> [{}, {}]",
        progress.stats.swaps,
        progress.pass,
        progress.left,
        progress.right,
        progress.values.0,
        progress.values.1
    )
}

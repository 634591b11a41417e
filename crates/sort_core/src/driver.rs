//! Background sort task: walks the bubble schedule against a
//! [`SharedSequence`], notifying an observer and pausing after every swap.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use tokio::{
    sync::watch,
    task::{JoinError, JoinHandle},
    time::{sleep_until, Instant},
};

use crate::{
    bubble::{BubbleSchedule, Comparison, SortStats},
    error::SortError,
    sequence::{SharedSequence, Step},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapProgress {
    pub pass: usize,
    pub left: usize,
    pub right: usize,
    /// Values at `left` and `right` after the swap.
    pub values: (u32, u32),
    pub stats: SortStats,
    pub total_comparisons: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOutcome {
    Completed(SortStats),
    Cancelled(SortStats),
    /// The sequence was regenerated while the sort was in flight.
    Superseded(SortStats),
}

impl SortOutcome {
    pub fn stats(&self) -> SortStats {
        match self {
            Self::Completed(stats) | Self::Cancelled(stats) | Self::Superseded(stats) => *stats,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed(_) => "completed",
            Self::Cancelled(_) => "cancelled",
            Self::Superseded(_) => "superseded by reset",
        }
    }
}

/// Receives progress from a running sort. Called from the sort task, so
/// implementations must only signal (request a repaint, queue an event).
pub trait SortObserver: Send + Sync {
    /// Called from the task before the first comparison.
    fn on_started(&self, _total_comparisons: u64) {}

    fn on_swap(&self, progress: &SwapProgress);

    fn on_finished(&self, _outcome: &SortOutcome) {}
}

struct RunningGuard(Arc<AtomicBool>);

impl RunningGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Starts paced sorts, allowing at most one in flight.
#[derive(Debug, Clone, Default)]
pub struct SortDriver {
    running: Arc<AtomicBool>,
}

impl SortDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Spawns the sort on the current tokio runtime.
    ///
    /// The sort is bound to the sequence generation current at this call; a
    /// later [`SharedSequence::replace`] ends it with
    /// [`SortOutcome::Superseded`].
    pub fn start(
        &self,
        shared: SharedSequence,
        pacing: Duration,
        observer: Arc<dyn SortObserver>,
    ) -> Result<SortTask, SortError> {
        let Some(guard) = RunningGuard::acquire(&self.running) else {
            tracing::warn!("rejected sort start: a sort is already in flight");
            return Err(SortError::AlreadyRunning);
        };

        let generation = shared.generation();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let pacer = Pacer {
            delay: pacing,
            cancel: Some(cancel_rx),
        };

        let handle = tokio::spawn(async move {
            let outcome = run_bubble_sort(&shared, generation, pacer, observer.as_ref()).await;
            drop(guard);
            observer.on_finished(&outcome);
            outcome
        });

        Ok(SortTask { cancel_tx, handle })
    }
}

/// Handle to an in-flight sort.
///
/// Dropping it without cancelling detaches the sort, which then runs to
/// completion.
pub struct SortTask {
    cancel_tx: watch::Sender<bool>,
    handle: JoinHandle<SortOutcome>,
}

impl SortTask {
    /// Stops the sort at its next step. The sequence keeps whatever order
    /// it had reached.
    pub fn cancel(&self) {
        // Fails only once the task has already finished.
        let _ = self.cancel_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn join(self) -> Result<SortOutcome, JoinError> {
        let Self { cancel_tx, handle } = self;
        let outcome = handle.await;
        drop(cancel_tx);
        outcome
    }
}

enum Pause {
    Elapsed,
    Cancelled,
}

struct Pacer {
    delay: Duration,
    cancel: Option<watch::Receiver<bool>>,
}

impl Pacer {
    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    async fn pause(&mut self) -> Pause {
        let deadline = Instant::now() + self.delay;
        let Some(cancel) = self.cancel.as_mut() else {
            sleep_until(deadline).await;
            return Pause::Elapsed;
        };

        let changed = tokio::select! {
            _ = sleep_until(deadline) => return Pause::Elapsed,
            changed = cancel.changed() => changed,
        };

        match changed {
            Ok(()) if *cancel.borrow_and_update() => Pause::Cancelled,
            Ok(()) => {
                sleep_until(deadline).await;
                Pause::Elapsed
            }
            Err(_) => {
                tracing::warn!("sort pause interrupted: control handle dropped, continuing detached");
                self.cancel = None;
                sleep_until(deadline).await;
                Pause::Elapsed
            }
        }
    }
}

async fn run_bubble_sort(
    shared: &SharedSequence,
    generation: u64,
    mut pacer: Pacer,
    observer: &dyn SortObserver,
) -> SortOutcome {
    let len = shared.len();
    let total_comparisons = BubbleSchedule::total_comparisons(len);
    let mut stats = SortStats::default();
    tracing::info!(len, generation, "bubble sort started");
    observer.on_started(total_comparisons);

    for Comparison { pass, index } in BubbleSchedule::new(len) {
        if pacer.cancelled() {
            tracing::info!(swaps = stats.swaps, "bubble sort cancelled");
            return SortOutcome::Cancelled(stats);
        }
        stats.passes = pass as u64 + 1;

        match shared.compare_and_swap_adjacent(generation, index) {
            Step::Stale => {
                tracing::info!(swaps = stats.swaps, "sequence regenerated mid-sort; abandoning sort");
                return SortOutcome::Superseded(stats);
            }
            Step::InOrder => stats.comparisons += 1,
            Step::Swapped { left, right } => {
                stats.comparisons += 1;
                stats.swaps += 1;
                tracing::trace!(pass, index, "swapped adjacent pair");
                observer.on_swap(&SwapProgress {
                    pass,
                    left: index,
                    right: index + 1,
                    values: (left, right),
                    stats,
                    total_comparisons,
                });
                if let Pause::Cancelled = pacer.pause().await {
                    tracing::info!(swaps = stats.swaps, "bubble sort cancelled");
                    return SortOutcome::Cancelled(stats);
                }
            }
        }
    }

    tracing::info!(
        comparisons = stats.comparisons,
        swaps = stats.swaps,
        "bubble sort completed"
    );
    SortOutcome::Completed(stats)
}

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod tests;

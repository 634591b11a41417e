//! Runtime bridge between the UI command queue and the sort worker.

use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};
use sort_core::{
    Sequence, SharedSequence, SortDriver, SortObserver, SortOutcome, SortTask, SwapProgress,
    VisualizerSettings,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::progress::SharedProgress;

pub type RepaintFn = Arc<dyn Fn() + Send + Sync>;

/// Everything the worker needs besides its channels.
pub struct BridgeContext {
    pub shared: SharedSequence,
    pub driver: SortDriver,
    pub settings: VisualizerSettings,
    pub rng: rand::rngs::StdRng,
    pub progress: SharedProgress,
    pub repaint: RepaintFn,
}

struct UiSortObserver {
    ui_tx: Sender<UiEvent>,
    progress: SharedProgress,
    repaint: RepaintFn,
}

impl UiSortObserver {
    fn send_lifecycle(&self, event: UiEvent) {
        // Only lifecycle events use the channel, a handful per user action.
        if let Err(err) = self.ui_tx.try_send(event) {
            tracing::warn!(event = ?err.into_inner(), "dropped sort lifecycle event");
        }
        (self.repaint)();
    }
}

impl SortObserver for UiSortObserver {
    fn on_started(&self, total_comparisons: u64) {
        self.progress.begin(total_comparisons);
        self.send_lifecycle(UiEvent::SortStarted { total_comparisons });
    }

    fn on_swap(&self, progress: &SwapProgress) {
        self.progress.record(*progress);
        (self.repaint)();
    }

    fn on_finished(&self, outcome: &SortOutcome) {
        self.send_lifecycle(UiEvent::SortFinished(*outcome));
    }
}

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    ctx: BridgeContext,
) -> thread::JoinHandle<()> {
    thread::spawn(move || run_worker(cmd_rx, ui_tx, ctx))
}

fn run_worker(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, ctx: BridgeContext) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("sort-driver")
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("sort worker startup failure: failed to build runtime: {err}"),
            )));
            tracing::error!("failed to build sort worker runtime: {err}");
            return;
        }
    };

    let BridgeContext {
        shared,
        driver,
        settings,
        mut rng,
        progress,
        repaint,
    } = ctx;
    let observer: Arc<dyn SortObserver> = Arc::new(UiSortObserver {
        ui_tx: ui_tx.clone(),
        progress,
        repaint: Arc::clone(&repaint),
    });

    runtime.block_on(async move {
        let mut active: Option<SortTask> = None;
        let _ = ui_tx.try_send(UiEvent::Info("Sort worker ready".to_string()));

        while let Ok(cmd) = cmd_rx.recv() {
            if active.as_ref().is_some_and(SortTask::is_finished) {
                active = None;
            }

            match cmd {
                BackendCommand::StartBubbleSort => {
                    match driver.start(shared.clone(), settings.step_delay(), Arc::clone(&observer)) {
                        Ok(task) => active = Some(task),
                        Err(err) => {
                            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_sort_error(
                                UiErrorContext::StartSort,
                                &err,
                            )));
                        }
                    }
                }
                BackendCommand::Reset => {
                    let sequence = Sequence::generate(settings.data_size, settings.max_value, &mut rng);
                    let generation = shared.replace(sequence);
                    tracing::info!(generation, "sequence regenerated");
                    let _ = ui_tx.try_send(UiEvent::DataReset { generation });
                    repaint();
                }
                BackendCommand::Shutdown => {
                    tracing::info!("sort worker shutting down");
                    break;
                }
            }
        }

        if let Some(task) = active.take() {
            task.cancel();
            if let Err(err) = task.join().await {
                tracing::error!("sort task failed during shutdown: {err}");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crossbeam_channel::bounded;
    use rand::SeedableRng;

    use super::*;
    use crate::controller::progress::HISTORY_CAPACITY;

    fn bridge(values: Vec<u32>) -> (SharedSequence, SortDriver, BridgeContext) {
        let shared = SharedSequence::new(Sequence::from_values(values, 100));
        let driver = SortDriver::new();
        let progress = SharedProgress::default();
        let ctx = BridgeContext {
            shared: shared.clone(),
            driver: driver.clone(),
            settings: VisualizerSettings {
                data_size: 6,
                step_delay_ms: 1,
                ..VisualizerSettings::default()
            },
            rng: rand::rngs::StdRng::seed_from_u64(11),
            progress,
            repaint: Arc::new(|| {}),
        };
        (shared, driver, ctx)
    }

    fn wait_for<F>(rx: &Receiver<UiEvent>, mut matches: F) -> UiEvent
    where
        F: FnMut(&UiEvent) -> bool,
    {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let event = rx.recv_timeout(remaining).expect("expected ui event before timeout");
            if matches(&event) {
                return event;
            }
        }
    }

    #[test]
    fn start_command_sorts_and_reports_completion() {
        let (shared, driver, ctx) = bridge(vec![6, 5, 4, 3, 2, 1]);
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(256);
        let worker = launch(cmd_rx, ui_tx, ctx);

        cmd_tx.send(BackendCommand::StartBubbleSort).expect("queue start");
        let started = wait_for(&ui_rx, |e| !matches!(e, UiEvent::Info(_)));
        assert!(matches!(started, UiEvent::SortStarted { total_comparisons: 15 }));

        // Started and finished are the only events a sort puts on the channel.
        let finished = wait_for(&ui_rx, |_| true);
        match finished {
            UiEvent::SortFinished(SortOutcome::Completed(stats)) => assert_eq!(stats.swaps, 15),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(shared.snapshot().values(), &[1, 2, 3, 4, 5, 6]);
        assert!(!driver.is_running());

        cmd_tx.send(BackendCommand::Shutdown).expect("queue shutdown");
        worker.join().expect("worker exits");
    }

    #[test]
    fn reset_regenerates_with_constant_length() {
        let (shared, _driver, ctx) = bridge(vec![1, 2, 3, 4, 5, 6]);
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(256);
        let worker = launch(cmd_rx, ui_tx, ctx);

        cmd_tx.send(BackendCommand::Reset).expect("queue reset");
        let reset = wait_for(&ui_rx, |e| matches!(e, UiEvent::DataReset { .. }));
        assert!(matches!(reset, UiEvent::DataReset { generation: 1 }));

        let snapshot = shared.snapshot();
        assert_eq!(snapshot.len(), 6);
        assert!(snapshot.values().iter().all(|v| (1..=100).contains(v)));

        drop(cmd_tx);
        worker.join().expect("worker exits on disconnect");
    }

    #[test]
    fn second_start_is_reported_as_busy() {
        let (_shared, _driver, mut ctx) = bridge((1..=30).rev().collect());
        ctx.settings.step_delay_ms = 20;
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(64);
        let worker = launch(cmd_rx, ui_tx, ctx);

        cmd_tx.send(BackendCommand::StartBubbleSort).expect("queue start");
        cmd_tx.send(BackendCommand::StartBubbleSort).expect("queue second start");
        let rejected = wait_for(&ui_rx, |e| matches!(e, UiEvent::Error(_)));
        match rejected {
            UiEvent::Error(err) => assert!(err.is_transient()),
            other => panic!("unexpected event: {other:?}"),
        }

        cmd_tx.send(BackendCommand::Shutdown).expect("queue shutdown");
        worker.join().expect("worker cancels in-flight sort and exits");
    }

    #[test]
    fn finish_is_delivered_when_the_ui_never_drains_during_a_sort() {
        let (shared, _driver, ctx) = bridge((1..=30).rev().collect());
        let progress = ctx.progress.clone();
        let (cmd_tx, cmd_rx) = bounded(8);
        // Room for the ready notice plus one sort's lifecycle, nothing more.
        let (ui_tx, ui_rx) = bounded(3);
        let worker = launch(cmd_rx, ui_tx, ctx);

        cmd_tx.send(BackendCommand::StartBubbleSort).expect("queue start");
        let deadline = Instant::now() + Duration::from_secs(10);
        while progress.latest().map(|p| p.stats.swaps) != Some(435) {
            assert!(Instant::now() < deadline, "sort did not reach its last swap");
            std::thread::sleep(Duration::from_millis(5));
        }

        let finished = wait_for(&ui_rx, |e| matches!(e, UiEvent::SortFinished(_)));
        assert!(matches!(finished, UiEvent::SortFinished(SortOutcome::Completed(_))));
        assert_eq!(progress.total_comparisons(), 435);
        assert_eq!(progress.history().len(), HISTORY_CAPACITY);
        assert!(shared.snapshot().is_sorted());

        cmd_tx.send(BackendCommand::Shutdown).expect("queue shutdown");
        worker.join().expect("worker exits");
    }
}

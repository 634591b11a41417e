use std::path::PathBuf;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use eframe::egui;
use sort_core::{SharedSequence, SortDriver, SortOutcome, VisualizerSettings};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::progress::{history_line, SharedProgress};
use crate::ui::canvas;

#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    pub settings: VisualizerSettings,
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortUiState {
    Idle,
    /// Start queued, worker has not answered yet.
    Starting,
    Running {
        comparisons: u64,
        swaps: u64,
        total_comparisons: u64,
    },
    Finished(SortOutcome),
}

fn status_text(state: SortUiState) -> String {
    match state {
        SortUiState::Idle => "Ready".to_string(),
        SortUiState::Starting => "Starting sort...".to_string(),
        SortUiState::Running {
            comparisons,
            swaps,
            total_comparisons,
        } => format!("Sorting: {swaps} swaps, {comparisons}/{total_comparisons} comparisons"),
        SortUiState::Finished(SortOutcome::Completed(stats)) => format!(
            "Sorted: {} swaps, {} comparisons",
            stats.swaps, stats.comparisons
        ),
        SortUiState::Finished(SortOutcome::Cancelled(stats)) => {
            format!("Sort cancelled after {} swaps", stats.swaps)
        }
        SortUiState::Finished(SortOutcome::Superseded(stats)) => {
            format!("Sort abandoned after reset ({} swaps)", stats.swaps)
        }
    }
}

pub struct VisualizerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    shared: SharedSequence,
    driver: SortDriver,
    progress: SharedProgress,
    sort_state: SortUiState,
    status: String,
    status_banner: Option<UiError>,
    show_history: bool,
    worker_lost: bool,
    shutdown_sent: bool,
}

impl VisualizerApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        shared: SharedSequence,
        driver: SortDriver,
        progress: SharedProgress,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            shared,
            driver,
            progress,
            sort_state: SortUiState::Idle,
            status: status_text(SortUiState::Idle),
            status_banner: None,
            show_history: false,
            worker_lost: false,
            shutdown_sent: false,
        }
    }

    fn sort_in_flight(&self) -> bool {
        self.driver.is_running() || self.sort_state == SortUiState::Starting
    }

    fn set_sort_state(&mut self, state: SortUiState) {
        self.sort_state = state;
        self.status = status_text(state);
    }

    fn process_ui_events(&mut self) {
        loop {
            let event = match self.ui_rx.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.on_worker_lost();
                    break;
                }
            };
            self.apply_event(event);
        }
        self.refresh_progress();
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                tracing::debug!(%message, "worker info");
                if !self.sort_in_flight() {
                    self.status = message;
                }
            }
            UiEvent::SortStarted { total_comparisons } => {
                // Only the start this UI is waiting on moves it to Running.
                if self.sort_state != SortUiState::Starting {
                    tracing::debug!(state = ?self.sort_state, "ignoring unexpected sort start");
                    return;
                }
                self.set_sort_state(SortUiState::Running {
                    comparisons: 0,
                    swaps: 0,
                    total_comparisons,
                });
            }
            UiEvent::SortFinished(outcome) => {
                self.set_sort_state(SortUiState::Finished(outcome));
                if self.status_banner.as_ref().is_some_and(UiError::is_transient) {
                    self.status_banner = None;
                }
            }
            UiEvent::DataReset { generation } => {
                tracing::debug!(generation, "sequence reset acknowledged");
                if !self.sort_in_flight() {
                    self.set_sort_state(SortUiState::Idle);
                    self.status = "Data reset".to_string();
                }
            }
            UiEvent::Error(err) => {
                tracing::warn!(
                    context = ?err.context(),
                    message = err.message(),
                    "sort worker reported error"
                );
                if self.sort_state == SortUiState::Starting {
                    self.set_sort_state(SortUiState::Idle);
                }
                self.status = format!("{} error: {}", err_label(err.category()), err.message());
                self.status_banner = Some(err);
            }
        }
    }

    fn on_worker_lost(&mut self) {
        if self.worker_lost {
            return;
        }
        self.worker_lost = true;
        if self.shutdown_sent {
            tracing::debug!("sort worker exited after shutdown");
            return;
        }
        tracing::error!("sort worker event channel disconnected");
        if self.sort_state == SortUiState::Starting {
            self.set_sort_state(SortUiState::Idle);
        }
        let err = UiError::from_message(
            UiErrorContext::WorkerLost,
            "Sort worker stopped unexpectedly",
        );
        self.status = format!("{} error: {}", err_label(err.category()), err.message());
        self.status_banner = Some(err);
    }

    /// Pulls the latest swap counts into the status line while sorting.
    fn refresh_progress(&mut self) {
        if let SortUiState::Running { .. } = self.sort_state {
            if let Some(progress) = self.progress.latest() {
                self.set_sort_state(SortUiState::Running {
                    comparisons: progress.stats.comparisons,
                    swaps: progress.stats.swaps,
                    total_comparisons: progress.total_comparisons,
                });
            }
        }
    }

    fn swap_highlight(&self) -> Option<(usize, usize)> {
        match self.sort_state {
            SortUiState::Running { .. } => self.progress.latest().map(|p| (p.left, p.right)),
            _ => None,
        }
    }

    fn show_controls(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let sort_btn = egui::Button::new("Bubble Sort");
                if ui.add_enabled(!self.sort_in_flight(), sort_btn).clicked()
                    && dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::StartBubbleSort,
                        &mut self.status,
                    )
                {
                    self.set_sort_state(SortUiState::Starting);
                }

                if ui.button("Reset").clicked() {
                    dispatch_backend_command(&self.cmd_tx, BackendCommand::Reset, &mut self.status);
                }

                ui.toggle_value(&mut self.show_history, "Swap History");

                ui.separator();
                ui.label(egui::RichText::new(&self.status).weak());
            });

            if let Some(banner) = self.status_banner.clone() {
                egui::Frame::NONE
                    .fill(egui::Color32::from_rgb(111, 53, 53))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::symmetric(10, 8))
                    .show(ui, |ui| {
                        ui.horizontal_wrapped(|ui| {
                            ui.label(
                                egui::RichText::new(format!(
                                    "{}: {}",
                                    err_label(banner.category()),
                                    banner.message()
                                ))
                                .color(egui::Color32::WHITE),
                            );
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.button("Dismiss").clicked() {
                                    self.status_banner = None;
                                }
                            });
                        });
                    });
            }
            ui.add_space(4.0);
        });
    }

    fn show_history_panel(&self, ctx: &egui::Context) {
        if !self.show_history {
            return;
        }
        let history = self.progress.history();
        egui::SidePanel::right("swap_history")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Swap History");
                ui.separator();
                if history.is_empty() {
                    ui.label(egui::RichText::new("No swaps yet").weak());
                    return;
                }
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for progress in &history {
                        ui.monospace(history_line(progress));
                    }
                });
            });
    }

    fn show_canvas(&self, ctx: &egui::Context) {
        let snapshot = self.shared.snapshot();
        let highlight = self.swap_highlight();
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| canvas::show(ui, &snapshot, highlight));
    }
}

impl eframe::App for VisualizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        if ctx.input(|i| i.viewport().close_requested()) && !self.shutdown_sent {
            self.shutdown_sent = true;
            dispatch_backend_command(&self.cmd_tx, BackendCommand::Shutdown, &mut self.status);
        }

        self.show_controls(ctx);
        self.show_history_panel(ctx);
        self.show_canvas(ctx);

        // Swaps request repaints directly; this is a fallback tick.
        if self.sort_in_flight() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

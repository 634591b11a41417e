use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod controller;
mod ui;

use anyhow::Context;
use backend_bridge::{
    commands::BackendCommand,
    runtime::{self, BridgeContext},
};
use clap::Parser;
use controller::{events::UiEvent, progress::SharedProgress};
use crossbeam_channel::bounded;
use eframe::egui;
use sort_core::{load_settings, Sequence, SharedSequence, SortDriver};
use ui::{StartupConfig, VisualizerApp};

const APP_TITLE: &str = "Algorithm Visualizer";

#[derive(Parser, Debug)]
#[command(name = "sortviz", about = "Animated bubble sort over random bars")]
struct Args {
    /// Settings file (defaults to ./sortviz.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    size: Option<usize>,
    #[arg(long)]
    max_value: Option<u32>,
    /// Pause after each swap, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn into_startup(self) -> anyhow::Result<StartupConfig> {
        let mut settings = load_settings(self.config.as_deref())?;
        if let Some(v) = self.size {
            settings.data_size = v;
        }
        if let Some(v) = self.max_value {
            settings.max_value = v;
        }
        if let Some(v) = self.delay_ms {
            settings.step_delay_ms = v;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        settings.validate()?;
        Ok(StartupConfig {
            settings,
            config_path: self.config,
        })
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let startup = Args::parse()
        .into_startup()
        .context("failed to resolve visualizer settings")?;
    let settings = startup.settings.clone();
    tracing::info!(
        size = settings.data_size,
        max_value = settings.max_value,
        delay_ms = settings.step_delay_ms,
        config = ?startup.config_path,
        "starting visualizer"
    );

    let mut rng = settings.rng();
    let shared = SharedSequence::new(Sequence::generate(
        settings.data_size,
        settings.max_value,
        &mut rng,
    ));
    let driver = SortDriver::new();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([320.0, 240.0]),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| {
            let egui_ctx = cc.egui_ctx.clone();
            let progress = SharedProgress::default();
            runtime::launch(
                cmd_rx,
                ui_tx,
                BridgeContext {
                    shared: shared.clone(),
                    driver: driver.clone(),
                    settings,
                    rng,
                    progress: progress.clone(),
                    repaint: Arc::new(move || egui_ctx.request_repaint()),
                },
            );
            Ok(Box::new(VisualizerApp::new(
                cmd_tx, ui_rx, shared, driver, progress,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("visualizer window failed: {err}"))
}

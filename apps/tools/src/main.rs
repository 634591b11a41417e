use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use sort_core::{
    bubble_sort_traced, load_settings, Sequence, SharedSequence, SortDriver, SortObserver,
    SortOutcome, SwapProgress, VisualizerSettings,
};

#[derive(Parser, Debug)]
#[command(name = "sortviz-tools", about = "Headless companion to the sort visualizer")]
struct Cli {
    #[arg(long)]
    config: Option<std::path::PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Comma-separated values, e.g. 5,3,8,1
    #[arg(long, value_delimiter = ',', conflicts_with_all = ["size", "seed"])]
    values: Option<Vec<u32>>,
    #[arg(long)]
    size: Option<usize>,
    #[arg(long)]
    max_value: Option<u32>,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a freshly generated sequence.
    Generate {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Sort synchronously and print every swap.
    Trace {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Run the paced background sort and print swaps as they happen.
    Animate {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        delay_ms: Option<u64>,
    },
}

fn resolve_sequence(settings: &VisualizerSettings, input: &InputArgs) -> Result<Sequence> {
    let max_value = input.max_value.unwrap_or(settings.max_value);
    if let Some(values) = &input.values {
        if let Some(bad) = values.iter().find(|v| **v == 0 || **v > max_value) {
            bail!("value {bad} is outside [1, {max_value}]");
        }
        return Ok(Sequence::from_values(values.clone(), max_value));
    }

    let settings = VisualizerSettings {
        data_size: input.size.unwrap_or(settings.data_size),
        max_value,
        seed: input.seed.or(settings.seed),
        ..settings.clone()
    };
    settings.validate()?;
    Ok(Sequence::generate(settings.data_size, settings.max_value, &mut settings.rng()))
}

fn format_values(values: &[u32]) -> String {
    let parts: Vec<String> = values.iter().map(u32::to_string).collect();
    format!("[{}]", parts.join(","))
}

struct PrintingObserver;

impl SortObserver for PrintingObserver {
    fn on_started(&self, total_comparisons: u64) {
        tracing::info!(total_comparisons, "animated sort started");
    }

    fn on_swap(&self, progress: &SwapProgress) {
        println!(
            "pass {} swap({},{}) swaps={} comparisons={}/{}",
            progress.pass,
            progress.left,
            progress.right,
            progress.stats.swaps,
            progress.stats.comparisons,
            progress.total_comparisons
        );
    }
}

/// Runs the paced sort to its end and returns the outcome with the final order.
async fn animate(
    sequence: Sequence,
    pacing: std::time::Duration,
) -> Result<(SortOutcome, Sequence)> {
    tracing::info!(
        len = sequence.len(),
        pacing_ms = pacing.as_millis() as u64,
        "starting paced sort"
    );
    let shared = SharedSequence::new(sequence);
    let task = SortDriver::new().start(shared.clone(), pacing, Arc::new(PrintingObserver))?;
    let outcome = task.join().await.context("sort task failed")?;
    let stats = outcome.stats();
    tracing::info!(
        outcome = outcome.label(),
        comparisons = stats.comparisons,
        swaps = stats.swaps,
        "paced sort finished"
    );
    Ok((outcome, shared.snapshot()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;
    tracing::info!(
        data_size = settings.data_size,
        max_value = settings.max_value,
        step_delay_ms = settings.step_delay_ms,
        seed = ?settings.seed,
        "settings loaded"
    );

    match cli.command {
        Command::Generate { input } => {
            let sequence = resolve_sequence(&settings, &input)?;
            println!("{}", format_values(sequence.values()));
        }
        Command::Trace { input } => {
            let sequence = resolve_sequence(&settings, &input)?;
            let mut values = sequence.into_values();
            println!("start {}", format_values(&values));
            let stats = bubble_sort_traced(&mut values, |record| println!("{record}"));
            println!(
                "done {} comparisons={} swaps={} passes={}",
                format_values(&values),
                stats.comparisons,
                stats.swaps,
                stats.passes
            );
        }
        Command::Animate { input, delay_ms } => {
            let sequence = resolve_sequence(&settings, &input)?;
            let pacing = delay_ms
                .map(std::time::Duration::from_millis)
                .unwrap_or_else(|| settings.step_delay());
            let (outcome, sorted) = animate(sequence, pacing).await?;
            let stats = outcome.stats();
            println!(
                "{} {} comparisons={} swaps={}",
                outcome.label(),
                format_values(sorted.values()),
                stats.comparisons,
                stats.swaps
            );
            if !matches!(outcome, SortOutcome::Completed(_)) {
                bail!("sort did not complete: {}", outcome.label());
            }
        }
    }

    Ok(())
}

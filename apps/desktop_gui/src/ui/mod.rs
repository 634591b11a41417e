//! UI layer for the visualizer: app shell and the bar canvas.

pub mod app;
pub mod canvas;

pub use app::{StartupConfig, VisualizerApp};

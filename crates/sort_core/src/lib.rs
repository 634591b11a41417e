//! Core of the sort visualizer: the data model, the bubble-sort schedule, the
//! paced background driver and the bar geometry the canvas draws from.

pub mod bubble;
pub mod driver;
pub mod error;
pub mod render;
pub mod sequence;
pub mod settings;

pub use bubble::{
    bubble_sort, bubble_sort_traced, BubbleSchedule, Comparison, SortStats, SwapRecord,
};
pub use driver::{SortDriver, SortObserver, SortOutcome, SortTask, SwapProgress};
pub use error::SortError;
pub use render::{bar_layout, Bar};
pub use sequence::{Sequence, SharedSequence, Step};
pub use settings::{load_settings, VisualizerSettings};

pub const DEFAULT_DATA_SIZE: usize = 50;
pub const DEFAULT_MAX_VALUE: u32 = 100;
pub const DEFAULT_STEP_DELAY_MS: u64 = 50;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

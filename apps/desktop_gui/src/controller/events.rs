//! Backend-to-UI events and error modeling for the visualizer controller.

use sort_core::{SortError, SortOutcome};

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    /// Sent from the sort task itself, ahead of its `SortFinished`. Per-swap
    /// progress goes through [`SharedProgress`](super::progress::SharedProgress).
    SortStarted { total_comparisons: u64 },
    SortFinished(SortOutcome),
    DataReset { generation: u64 },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Busy,
    Configuration,
    Backend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    StartSort,
    /// The worker hung up while the UI was still listening.
    WorkerLost,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("already in progress") || lower.contains("queue is full") {
            UiErrorCategory::Busy
        } else if lower.contains("invalid settings") || lower.contains("settings file") {
            UiErrorCategory::Configuration
        } else {
            UiErrorCategory::Backend
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_sort_error(context: UiErrorContext, err: &SortError) -> Self {
        let category = match err {
            SortError::AlreadyRunning => UiErrorCategory::Busy,
            SortError::InvalidSettings(_) => UiErrorCategory::Configuration,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    /// Busy errors clear themselves once the sort finishes.
    pub fn is_transient(&self) -> bool {
        self.category == UiErrorCategory::Busy
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Busy => "Busy",
        UiErrorCategory::Configuration => "Configuration",
        UiErrorCategory::Backend => "Backend",
    }
}

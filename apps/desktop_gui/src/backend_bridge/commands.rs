//! Commands queued from UI to the backend worker.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendCommand {
    StartBubbleSort,
    Reset,
    Shutdown,
}

impl BackendCommand {
    pub fn name(self) -> &'static str {
        match self {
            Self::StartBubbleSort => "start_bubble_sort",
            Self::Reset => "reset",
            Self::Shutdown => "shutdown",
        }
    }
}

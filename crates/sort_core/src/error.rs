use thiserror::Error;

#[derive(Debug, Error)]
pub enum SortError {
    #[error("a sort is already in progress")]
    AlreadyRunning,
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

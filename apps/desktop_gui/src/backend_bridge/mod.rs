//! Backend bridge: the worker thread that owns the tokio runtime and the sort driver.

pub mod commands;
pub mod runtime;

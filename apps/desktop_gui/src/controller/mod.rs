//! Controller layer: bridge events, error modeling, and command dispatch.

pub mod events;
pub mod orchestration;
pub mod progress;

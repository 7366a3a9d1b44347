pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod scoring;

pub use crate::core::{ScoredTask, Task, TaskBatch, TaskId, Warning};
pub use error::{Error, Result};
pub use scoring::{Analysis, ScoringEngine, Strategy};

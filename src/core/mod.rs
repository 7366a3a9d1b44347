//! Core domain models for taskrank.
//!
//! Tasks as submitted and scored, the per-request dependency graph, and the
//! structural warnings raised while building it.

pub mod graph;
pub mod task;
pub mod warning;

pub use graph::{CycleReport, DependencyGraph, GraphAnalysis};
pub use task::{normalize_batch, ScoredTask, Task, TaskBatch, TaskId, TaskInput};
pub use warning::Warning;

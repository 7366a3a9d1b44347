//! Structural warnings raised while preparing a batch.
//!
//! None of these abort a request. They are carried alongside the scored
//! tasks and serialized as plain strings.

use crate::core::task::TaskId;
use serde::{Serialize, Serializer};

/// A non-fatal anomaly found in a task batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A dependency names a task that is not in the batch. The edge is dropped.
    UnknownDependency { dependency: TaskId, task: TaskId },
    /// A dependency loop, listed from the first task on the loop back to itself.
    CircularDependency { path: Vec<TaskId> },
    /// Two or more tasks share an id. Only the last one is kept.
    DuplicateTaskId { id: TaskId },
    /// A task lists the same prerequisite more than once.
    DuplicateDependency { dependency: TaskId, task: TaskId },
    /// A task lists itself as a prerequisite. The edge is dropped.
    SelfDependency { task: TaskId },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::UnknownDependency { dependency, task } => {
                write!(f, "unknown dependency: {} referenced by {}", dependency, task)
            }
            Warning::CircularDependency { path } => {
                let joined = path
                    .iter()
                    .map(|id| id.as_str())
                    .collect::<Vec<_>>()
                    .join(" -> ");
                write!(f, "circular dependency detected: {}", joined)
            }
            Warning::DuplicateTaskId { id } => {
                write!(f, "duplicate task id: {} (keeping last occurrence)", id)
            }
            Warning::DuplicateDependency { dependency, task } => write!(
                f,
                "duplicate dependency: {} listed more than once by {}",
                dependency, task
            ),
            Warning::SelfDependency { task } => write!(f, "self dependency ignored: {}", task),
        }
    }
}

impl Serialize for Warning {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

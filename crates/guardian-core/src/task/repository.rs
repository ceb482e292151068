//! Task repository trait.
//!
//! Defines the interface for the task persistence backend.

use async_trait::async_trait;

use super::Task;
use crate::error::Result;

/// An abstract repository for the task collection.
///
/// Plain request/response: no transactions and no pagination. Failures of a
/// remote backend surface as `GuardianError::Upstream`.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Finds a task by its ID.
    ///
    /// - `Ok(Some(Task))`: Task found
    /// - `Ok(None)`: Task not found
    async fn find_by_id(&self, task_id: &str) -> Result<Option<Task>>;

    /// Inserts or replaces a task.
    async fn save(&self, task: &Task) -> Result<()>;

    /// Deletes a task. Deleting a missing task is not an error.
    async fn delete(&self, task_id: &str) -> Result<()>;

    /// Lists all tasks, most recently created first.
    async fn list_all(&self) -> Result<Vec<Task>>;
}

//! Task repository trait
//!
//! Defines the storage port every task backend implements.

use async_trait::async_trait;

use super::model::{NewTask, Task, TaskId, TaskPatch};
use crate::Result;

/// Repository interface for task CRUD operations
///
/// A missing record is never an error: lookups and mutations that target an
/// unknown id return `Ok(None)`. Errors are reserved for storage failures.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Store a new task with a fresh id and timestamps, returning the stored record
    async fn create(&self, new_task: NewTask) -> Result<Task>;

    /// Get a task by ID
    async fn find(&self, id: &TaskId) -> Result<Option<Task>>;

    /// Get all tasks in storage order
    async fn find_all(&self) -> Result<Vec<Task>>;

    /// Merge `patch` onto an existing task and return the merged record
    async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<Option<Task>>;

    /// Delete a task by ID, returning the removed record
    async fn delete(&self, id: &TaskId) -> Result<Option<Task>>;

    /// Short backend label for logs and health reporting
    fn backend_name(&self) -> &'static str;
}

//! File-based task storage implementation
//!
//! Stores tasks as a single JSON array on disk. Every operation reads the
//! whole file, and every mutation rewrites it in full.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use super::model::{NewTask, Task, TaskId, TaskPatch};
use super::repository::TaskRepository;
use crate::persistence::{read_json_or_default, write_json_atomic};
use crate::Result;

/// File-based task repository using a JSON array
///
/// There is no cache: `find_all` always reflects the last completed write.
/// Mutations inside one process are serialized by `write_lock`; separate
/// processes sharing the file still race, and the last writer wins.
pub struct FileTaskRepository {
    /// Path to the JSON file
    path: PathBuf,
    /// Guards the read-modify-write cycle of mutating operations
    write_lock: Mutex<()>,
}

impl FileTaskRepository {
    /// Create a new FileTaskRepository
    ///
    /// Nothing touches the disk here. A missing file reads as an empty
    /// collection and is created, along with its directory, on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<Task>> {
        read_json_or_default(&self.path).await
    }

    async fn persist(&self, tasks: &[Task]) -> Result<()> {
        write_json_atomic(&self.path, tasks).await
    }
}

#[async_trait]
impl TaskRepository for FileTaskRepository {
    async fn create(&self, new_task: NewTask) -> Result<Task> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.load().await?;

        let task = Task::from_new(new_task);
        tasks.push(task.clone());
        self.persist(&tasks).await?;

        debug!("Stored task {} ({} total)", task.id, tasks.len());
        Ok(task)
    }

    async fn find(&self, id: &TaskId) -> Result<Option<Task>> {
        let tasks = self.load().await?;
        Ok(tasks.into_iter().find(|t| &t.id == id))
    }

    async fn find_all(&self) -> Result<Vec<Task>> {
        self.load().await
    }

    async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<Option<Task>> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.load().await?;

        let Some(index) = tasks.iter().position(|t| &t.id == id) else {
            return Ok(None);
        };

        let mut task = tasks[index].clone();
        task.apply(patch);
        tasks[index] = task.clone();
        self.persist(&tasks).await?;

        Ok(Some(task))
    }

    async fn delete(&self, id: &TaskId) -> Result<Option<Task>> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.load().await?;

        let Some(index) = tasks.iter().position(|t| &t.id == id) else {
            return Ok(None);
        };

        let removed = tasks.remove(index);
        self.persist(&tasks).await?;

        debug!("Removed task {} ({} remaining)", removed.id, tasks.len());
        Ok(Some(removed))
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

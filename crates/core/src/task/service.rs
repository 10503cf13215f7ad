//! Task service
//!
//! Holds the storage backend chosen at startup and forwards every call to it
//! unchanged, so the HTTP layer never depends on a concrete backend.

use std::sync::Arc;
use tracing::{info, instrument};

use super::file_store::FileTaskRepository;
use super::memory_store::InMemoryTaskRepository;
use super::model::{NewTask, Task, TaskId, TaskPatch};
use super::repository::TaskRepository;
use crate::config::{select_backend, StorageBackend, StorageSettings};
use crate::Result;

#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    /// Build the service around the backend `settings` select
    pub fn from_settings(settings: &StorageSettings) -> Self {
        let repository: Arc<dyn TaskRepository> = match select_backend(settings) {
            StorageBackend::File => Arc::new(FileTaskRepository::new(&settings.data_file)),
            StorageBackend::Memory => Arc::new(InMemoryTaskRepository::new()),
        };
        info!(
            "Task service initialized with {} backend ({} mode)",
            repository.backend_name(),
            settings.mode
        );
        Self::new(repository)
    }

    pub fn backend_name(&self) -> &'static str {
        self.repository.backend_name()
    }

    #[instrument(skip(self))]
    pub async fn find(&self, id: &TaskId) -> Result<Option<Task>> {
        self.repository.find(id).await
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Task>> {
        self.repository.find_all().await
    }

    #[instrument(skip(self, new_task), fields(task_title = %new_task.title))]
    pub async fn create(&self, new_task: NewTask) -> Result<Task> {
        self.repository.create(new_task).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<Option<Task>> {
        self.repository.update(id, patch).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &TaskId) -> Result<Option<Task>> {
        self.repository.delete(id).await
    }
}

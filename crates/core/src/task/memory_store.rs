//! In-memory task storage
//!
//! Same contract as the file store without touching disk. Selected for the
//! `test` deployment mode.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::{NewTask, Task, TaskId, TaskPatch};
use super::repository::TaskRepository;
use crate::Result;

#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, new_task: NewTask) -> Result<Task> {
        let task = Task::from_new(new_task);
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn find(&self, id: &TaskId) -> Result<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|t| &t.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.read().await.clone())
    }

    async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.iter_mut().find(|t| &t.id == id).map(|task| {
            task.apply(patch);
            task.clone()
        }))
    }

    async fn delete(&self, id: &TaskId) -> Result<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        let removed = tasks
            .iter()
            .position(|t| &t.id == id)
            .map(|index| tasks.remove(index));
        Ok(removed)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

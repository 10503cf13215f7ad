//! Post-commit task notifications
//!
//! Callers emit these after a mutation has been persisted. Listeners get the
//! full record, not just the id.

use tokio::sync::broadcast;

use super::model::Task;

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    Created(Task),
    Updated(Task),
    Completed(Task),
    Deleted(Task),
}

impl TaskEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created(_) => "task.created",
            Self::Updated(_) => "task.updated",
            Self::Completed(_) => "task.completed",
            Self::Deleted(_) => "task.deleted",
        }
    }

    pub fn task(&self) -> &Task {
        match self {
            Self::Created(task)
            | Self::Updated(task)
            | Self::Completed(task)
            | Self::Deleted(task) => task,
        }
    }
}

/// Fan-out channel for task events
#[derive(Clone)]
pub struct TaskEventBus {
    tx: broadcast::Sender<TaskEvent>,
}

impl TaskEventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event, returning how many listeners received it
    ///
    /// Having no listeners is not an error.
    pub fn emit(&self, event: TaskEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.tx.subscribe()
    }
}

impl Default for TaskEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::NewTask;

    #[tokio::test]
    async fn test_emit_without_listeners() {
        let bus = TaskEventBus::new();
        let task = Task::from_new(NewTask::new("Nobody listens"));
        assert_eq!(bus.emit(TaskEvent::Created(task)), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_full_record() {
        let bus = TaskEventBus::new();
        let mut rx = bus.subscribe();
        let task = Task::from_new(NewTask::new("Ship it"));

        assert_eq!(bus.emit(TaskEvent::Deleted(task.clone())), 1);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind(), "task.deleted");
        assert_eq!(event.task(), &task);
    }
}

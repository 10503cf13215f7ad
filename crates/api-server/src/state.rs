//! Application state

use std::sync::Arc;

use tasker_core::config::DeploymentMode;
use tasker_core::task::{TaskEventBus, TaskService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    task_service: TaskService,
    events: TaskEventBus,
    mode: DeploymentMode,
}

impl AppState {
    pub fn new(task_service: TaskService, events: TaskEventBus, mode: DeploymentMode) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                task_service,
                events,
                mode,
            }),
        }
    }

    /// Get reference to the task service
    pub fn task_service(&self) -> &TaskService {
        &self.inner.task_service
    }

    pub fn events(&self) -> &TaskEventBus {
        &self.inner.events
    }

    pub fn mode(&self) -> DeploymentMode {
        self.inner.mode
    }
}

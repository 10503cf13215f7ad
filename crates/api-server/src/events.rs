//! Task event listener
//!
//! Logs every task mutation published on the event bus.

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use tasker_core::task::{TaskEvent, TaskEventBus};

pub fn spawn_event_logger(bus: &TaskEventBus) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Task event logger lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn log_event(event: &TaskEvent) {
    let task = event.task();
    let action = match event {
        TaskEvent::Created(_) => "New task created",
        TaskEvent::Updated(_) => "Task updated",
        TaskEvent::Completed(_) => "Task completed",
        TaskEvent::Deleted(_) => "Task deleted",
    };
    info!(
        event = event.kind(),
        "{}: \"{}\" (ID: {})",
        action,
        task.title,
        task.id
    );
}

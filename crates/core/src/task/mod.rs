//! Task module
//!
//! This module contains the task record, the storage port and its backends.

mod event;
mod file_store;
mod memory_store;
mod model;
mod repository;
mod service;

pub use event::{TaskEvent, TaskEventBus};
pub use file_store::FileTaskRepository;
pub use memory_store::InMemoryTaskRepository;
pub use model::*;
pub use repository::TaskRepository;
pub use service::TaskService;

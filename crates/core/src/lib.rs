//! Core library for the Tasker task API
//!
//! This crate contains the storage side of the service:
//! - The task record and its partial-update type
//! - The `TaskRepository` storage port and its file-backed and in-memory backends
//! - The `TaskService` seam and the configuration-driven backend selection

pub mod config;
pub mod error;
pub mod persistence;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

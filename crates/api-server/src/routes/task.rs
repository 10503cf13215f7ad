//! Task API endpoints
//!
//! RESTful API for task CRUD operations.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use tasker_core::task::{NewTask, Task, TaskEvent, TaskId, TaskPatch, TaskPriority};

use crate::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    pub data: T,
}

impl<T> Envelope<T> {
    fn success(data: T) -> Json<Self> {
        Json(Self {
            status: "success",
            results: None,
            data,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TaskListData {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
pub struct TaskData {
    pub task: Task,
}

type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/tasks - List all tasks
async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Envelope<TaskListData>>> {
    let tasks = state
        .task_service()
        .find_all()
        .await
        .map_err(|e| ApiError::internal(e, state.mode()))?;

    Ok(Json(Envelope {
        status: "success",
        results: Some(tasks.len()),
        data: TaskListData { tasks },
    }))
}

/// POST /api/tasks - Create a new task
async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<TaskData>>)> {
    let Json(req) = payload?;
    let title = req
        .title
        .filter(|title| !title.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Title is required"))?;

    let mut new_task = NewTask::new(title);

    if let Some(desc) = req.description {
        new_task = new_task.with_description(desc);
    }

    if let Some(priority) = req.priority {
        new_task = new_task.with_priority(priority);
    }

    if let Some(completed) = req.completed {
        new_task = new_task.with_completed(completed);
    }

    let created = state
        .task_service()
        .create(new_task)
        .await
        .map_err(|e| ApiError::internal(e, state.mode()))?;

    state.events().emit(TaskEvent::Created(created.clone()));

    Ok((StatusCode::CREATED, Envelope::success(TaskData { task: created })))
}

/// GET /api/tasks/:id - Get a single task
async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> ApiResult<Json<Envelope<TaskData>>> {
    let task = state
        .task_service()
        .find(&id)
        .await
        .map_err(|e| ApiError::internal(e, state.mode()))?;

    match task {
        Some(task) => Ok(Envelope::success(TaskData { task })),
        None => Err(ApiError::task_not_found(&id)),
    }
}

/// PUT/PATCH /api/tasks/:id - Merge fields onto a task
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> ApiResult<Json<Envelope<TaskData>>> {
    let Json(patch) = payload?;
    if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ApiError::bad_request("Title cannot be empty"));
    }

    let marks_completed = patch.completed == Some(true);

    let updated = state
        .task_service()
        .update(&id, patch)
        .await
        .map_err(|e| ApiError::internal(e, state.mode()))?
        .ok_or_else(|| ApiError::task_not_found(&id))?;

    state.events().emit(TaskEvent::Updated(updated.clone()));
    if marks_completed {
        state.events().emit(TaskEvent::Completed(updated.clone()));
    }

    Ok(Envelope::success(TaskData { task: updated }))
}

/// DELETE /api/tasks/:id - Delete a task
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> ApiResult<Json<Envelope<Option<TaskData>>>> {
    let deleted = state
        .task_service()
        .delete(&id)
        .await
        .map_err(|e| ApiError::internal(e, state.mode()))?
        .ok_or_else(|| ApiError::task_not_found(&id))?;

    state.events().emit(TaskEvent::Deleted(deleted));

    Ok(Envelope::success(None))
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task)
                .put(update_task)
                .patch(update_task)
                .delete(delete_task),
        )
}

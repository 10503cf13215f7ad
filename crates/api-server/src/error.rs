//! HTTP error responses

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use tasker_core::config::DeploymentMode;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// Storage failure; `detail` is only populated outside production
    Internal { detail: Option<String> },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn task_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Task with ID {} not found", id))
    }

    pub fn internal(err: tasker_core::Error, mode: DeploymentMode) -> Self {
        error!("Request failed: {}", err);
        let detail = if mode.is_production() {
            None
        } else {
            Some(err.to_string())
        };
        Self::Internal { detail }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    status: "fail",
                    message,
                    detail: None,
                },
            ),
            Self::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    status: "fail",
                    message,
                    detail: None,
                },
            ),
            Self::Internal { detail } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    status: "error",
                    message: "Internal server error".to_string(),
                    detail,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

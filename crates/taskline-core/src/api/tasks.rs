//! Tasks handlers - `/tasks` のハンドラ

use axum::body::Bytes;
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::error::ApiError;
use crate::app::TaskService;
use crate::domain::{Task, ValidationError};

/// Body of `POST /tasks`.
///
/// Only `title` and `description` are read; `id`, `status`, `completed`
/// and `created_at` in the body are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl CreateTaskRequest {
    /// Decode a raw body. Any content type is accepted as long as the bytes
    /// are a JSON task object.
    pub fn from_slice(body: &[u8]) -> Result<Self, ValidationError> {
        serde_json::from_slice(body).map_err(|e| ValidationError::MalformedBody(e.to_string()))
    }
}

pub async fn create_task_handler(
    State(service): State<TaskService>,
    body: Bytes,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let request = CreateTaskRequest::from_slice(&body).inspect_err(|e| {
        warn!(error = %e, "rejected task body");
    })?;
    let task = service
        .create_task(request.title, request.description)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_tasks_handler(
    State(service): State<TaskService>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = service.list_tasks().await?;
    Ok(Json(tasks))
}

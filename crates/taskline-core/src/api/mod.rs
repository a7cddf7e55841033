//! API - HTTP の入口（axum）
//!
//! # ルート
//! - `POST /tasks`: intake（201 + タスクの JSON）
//! - `GET /tasks`: 一覧

pub mod error;
pub mod tasks;

use axum::Router;
use axum::routing::post;

use crate::app::TaskService;
use tasks::{create_task_handler, list_tasks_handler};

pub use error::ApiError;
pub use tasks::CreateTaskRequest;

pub fn build_router(service: TaskService) -> Router {
    Router::new()
        .route("/tasks", post(create_task_handler).get(list_tasks_handler))
        .with_state(service)
}

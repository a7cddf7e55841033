//! Errors - ドメインのエラー型
//!
//! # 含まれるもの
//! - ValidationError: クライアント入力の検証失敗
//! - ParseTaskStatusError: 永続化された status 文字列が読めない

use thiserror::Error;

/// Errors returned while building a [`NewTask`](super::NewTask) from client input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The request body is not a JSON task object.
    #[error("malformed task body: {0}")]
    MalformedBody(String),

    /// The title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

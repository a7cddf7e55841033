//! ApiError - エラーを HTTP ステータスに写す
//!
//! - 検証エラー: 400
//! - store エラー: 500
//! - queue が閉じている: 503

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::app::IntakeError;
use crate::domain::ValidationError;
use crate::ports::{QueueError, StoreError};

/// Errors surfaced to HTTP clients as plain text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Unavailable(#[from] QueueError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::Validation(e) => ApiError::Validation(e),
            IntakeError::Storage(e) => ApiError::Storage(e),
            IntakeError::Queue(e) => ApiError::Unavailable(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;
    use rstest::rstest;

    #[rstest]
    #[case(ApiError::Validation(ValidationError::EmptyTitle), StatusCode::BAD_REQUEST)]
    #[case(ApiError::Storage(StoreError::NotFound(TaskId::new(1))), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(ApiError::Unavailable(QueueError::Closed), StatusCode::SERVICE_UNAVAILABLE)]
    fn status_codes(#[case] err: ApiError, #[case] expected: StatusCode) {
        assert_eq!(err.status(), expected);
        assert_eq!(err.into_response().status(), expected);
    }

    #[test]
    fn intake_errors_keep_their_category() {
        let err: ApiError = IntakeError::Queue(QueueError::Closed).into();
        assert!(matches!(err, ApiError::Unavailable(QueueError::Closed)));
    }
}

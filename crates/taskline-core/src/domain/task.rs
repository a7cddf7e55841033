//! Task - タスクのレコードと入力
//!
//! # 型
//! - Task: 永続化・一覧で返す形（JSON の形もこれ）
//! - NewTask: 検証済みの入力。status は常に Pending で始まる

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{TaskId, TaskStatus, ValidationError};

/// A task as persisted and listed.
///
/// `completed` is carried for wire/storage compatibility only. Nothing in the
/// core reads it and the worker never flips it; `status` is the field the
/// lifecycle runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Attach the store-assigned id to an accepted task.
    pub fn from_new(id: TaskId, new_task: NewTask) -> Self {
        Self {
            id,
            title: new_task.title,
            description: new_task.description,
            completed: new_task.completed,
            status: new_task.status,
            created_at: new_task.created_at,
        }
    }
}

/// A validated task that has not been given an id yet.
///
/// Intake state is fixed here: whatever the client sent for status,
/// completion or timestamps never reaches this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    title: String,
    description: String,
    completed: bool,
    status: TaskStatus,
    created_at: DateTime<Utc>,
}

impl NewTask {
    /// Build a pending task stamped with `created_at`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] when the title is blank.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(Self {
            title,
            description: description.into(),
            completed: false,
            status: TaskStatus::Pending,
            created_at,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn new_task_starts_pending_and_not_completed() {
        let task = NewTask::new("write docs", "", fixed_time()).unwrap();
        assert_eq!(task.status(), TaskStatus::Pending);
        assert!(!task.completed());
        assert_eq!(task.created_at(), fixed_time());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\t")]
    fn blank_titles_are_rejected(#[case] title: &str) {
        let err = NewTask::new(title, "desc", fixed_time()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle);
    }

    #[test]
    fn task_json_uses_rfc3339_and_lowercase_status() {
        let new_task = NewTask::new("A", "B", fixed_time()).unwrap();
        let task = Task::from_new(TaskId::new(1), new_task);

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "title": "A",
                "description": "B",
                "completed": false,
                "status": "pending",
                "created_at": "2024-01-01T12:00:00Z",
            })
        );
    }
}

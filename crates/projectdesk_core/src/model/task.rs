//! Task entity and DTO.
//!
//! # Invariants
//! - A task has at most one assignee (`user_id`).
//! - `project_id` is cleared by storage when the owning project is deleted.

use crate::model::project::ProjectId;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable task identifier.
pub type TaskId = Uuid;

/// Stored task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub project_id: Option<ProjectId>,
    /// Assignee. `None` until assigned to a project member.
    pub user_id: Option<UserId>,
    /// Unix epoch milliseconds taken from the SQLite clock on first insert.
    /// Rows inserted within the same millisecond share a value.
    pub created_at: i64,
}

impl Task {
    /// Creates an unassigned task with a generated id.
    pub fn new(title: impl Into<String>, project_id: Option<ProjectId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            project_id,
            user_id: None,
            created_at: 0,
        }
    }

    /// Sets the assignee.
    pub fn assign_to(&mut self, user_id: UserId) {
        self.user_id = Some(user_id);
    }

    pub fn is_assigned(&self) -> bool {
        self.user_id.is_some()
    }
}

/// Boundary projection of [`Task`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

impl From<Task> for TaskDto {
    fn from(task: Task) -> Self {
        Self {
            id: Some(task.id),
            title: Some(task.title),
            project_id: task.project_id,
            user_id: task.user_id,
        }
    }
}

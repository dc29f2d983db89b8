/// Task model
///
/// Tasks live in exactly one project and sit in one of the three kanban
/// columns. Any status may follow any other; there is no enforced workflow.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'done');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title TEXT NOT NULL CHECK (length(title) > 0),
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'todo',
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     assignee_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProjectId, TaskId, UserId};

/// Kanban column of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,

    pub title: String,

    pub description: Option<String>,

    pub status: TaskStatus,

    /// Owning project; authorization is always evaluated against this value
    pub project_id: ProjectId,

    /// Optional assignee
    pub assignee_id: Option<UserId>,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub project_id: ProjectId,
    pub assignee_id: Option<UserId>,
}

/// Input for updating an existing task
///
/// `project_id` is deliberately absent: tasks cannot move between projects.
/// For the nullable fields, `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub assignee_id: Option<Option<UserId>>,
}

impl UpdateTask {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.assignee_id.is_none()
    }

    /// Applies the update to an in-memory task
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(assignee_id) = self.assignee_id {
            task.assignee_id = assignee_id;
        }
    }
}

/// Task endpoints
///
/// # Endpoints
///
/// - `GET /api/projects/:id/tasks` - Tasks of a project
/// - `POST /api/projects/:id/tasks` - Create a task in a project
/// - `PATCH /api/tasks/:id` - Partial update
/// - `DELETE /api/tasks/:id` - Delete
///
/// All operations require membership of the task's project.

use super::parse_body;
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use taskboard_shared::{
    auth::middleware::AuthContext,
    models::{deserialize_nullable, ProjectId, Task, TaskId, TaskStatus, UpdateTask, UserId},
    services::NewTask,
};
use validator::Validate;

/// Create task request; the project comes from the path
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 500, message = "Title must be 1 to 500 characters"))]
    pub title: String,

    pub description: Option<String>,

    /// Defaults to `todo`
    pub status: Option<TaskStatus>,

    pub assignee_id: Option<UserId>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(req: CreateTaskRequest) -> Self {
        NewTask {
            title: req.title,
            description: req.description,
            status: req.status,
            assignee_id: req.assignee_id,
        }
    }
}

/// Partial task update
///
/// `null` clears `description` or `assigneeId`; absent fields are kept.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 500, message = "Title must be 1 to 500 characters"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub description: Option<Option<String>>,

    pub status: Option<TaskStatus>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub assignee_id: Option<Option<UserId>>,
}

impl From<UpdateTaskRequest> for UpdateTask {
    fn from(req: UpdateTaskRequest) -> Self {
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            assignee_id: req.assignee_id,
        }
    }
}

pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthContext,
    path: Result<Path<ProjectId>, PathRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    let Path(project_id) = path?;

    let tasks = state.services.tasks.list(auth.user_id, project_id).await?;
    Ok(Json(tasks))
}

/// Create a task
///
/// ```text
/// POST /api/projects/:id/tasks
/// { "title": "T1", "status": "todo", "assigneeId": 2 }
/// ```
///
/// Responds `201 Created` with the task. The body is decoded only after
/// membership is confirmed.
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    path: Result<Path<ProjectId>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Path(project_id) = path?;
    let Json(body) = payload?;

    state.services.projects.get(auth.user_id, project_id).await?;
    let req: CreateTaskRequest = parse_body(body)?;

    let task = state
        .services
        .tasks
        .create(auth.user_id, project_id, req.into())
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Update a task
///
/// # Errors
///
/// - `403 Forbidden`: caller is not a member of the task's project
/// - `404 Not Found`: no such task
/// - `400 Bad Request`: invalid fields, reported only to members
pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthContext,
    path: Result<Path<TaskId>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Path(task_id) = path?;
    let Json(body) = payload?;

    state.services.tasks.authorize(auth.user_id, task_id).await?;
    let req: UpdateTaskRequest = parse_body(body)?;

    let task = state
        .services
        .tasks
        .update(auth.user_id, task_id, req.into())
        .await?;

    Ok(Json(task))
}

/// Delete a task; responds `204 No Content`
pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    path: Result<Path<TaskId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(task_id) = path?;

    state.services.tasks.delete(auth.user_id, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

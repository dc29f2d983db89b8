/// Project endpoints
///
/// # Endpoints
///
/// - `GET /api/projects` - Projects the caller owns or belongs to
/// - `POST /api/projects` - Create a project owned by the caller
/// - `GET /api/projects/:id` - Single project (members only)
/// - `PATCH /api/projects/:id` - Partial update (owner only)

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
    models::{deserialize_nullable, Project, ProjectId, ProjectStatus, UpdateProject},
};
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1 to 200 characters"))]
    pub name: String,

    pub description: Option<String>,
}

/// Partial project update
///
/// Absent fields are left alone; `"description": null` clears the
/// description.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1 to 200 characters"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub description: Option<Option<String>>,

    pub status: Option<ProjectStatus>,
}

impl From<UpdateProjectRequest> for UpdateProject {
    fn from(req: UpdateProjectRequest) -> Self {
        UpdateProject {
            name: req.name,
            description: req.description,
            status: req.status,
        }
    }
}

/// List the caller's projects
///
/// Owned and member projects, each listed once.
pub async fn list_projects(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = state.services.projects.list_for_user(auth.user_id).await?;
    Ok(Json(projects))
}

/// Create a project
///
/// ```text
/// POST /api/projects
/// { "name": "P1", "description": "optional" }
/// ```
///
/// Responds `201 Created` with the project (`status: "active"`).
pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthContext,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let Json(req) = payload?;
    req.validate()?;

    let project = state
        .services
        .projects
        .create(auth.user_id, &req.name, req.description)
        .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// Get a single project
///
/// # Errors
///
/// - `403 Forbidden`: caller is not a member
/// - `404 Not Found`: no such project
pub async fn get_project(
    State(state): State<AppState>,
    auth: AuthContext,
    path: Result<Path<ProjectId>, PathRejection>,
) -> ApiResult<Json<Project>> {
    let Path(project_id) = path?;

    let project = state.services.projects.get(auth.user_id, project_id).await?;
    Ok(Json(project))
}

/// Update project fields
///
/// ```text
/// PATCH /api/projects/:id
/// { "status": "archived" }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: caller is not the owner
/// - `404 Not Found`: no such project
/// - `400 Bad Request`: invalid fields, reported only to the owner
pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthContext,
    path: Result<Path<ProjectId>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Project>> {
    let Path(project_id) = path?;
    let Json(body) = payload?;

    state
        .services
        .projects
        .authorize_owner(auth.user_id, project_id)
        .await?;
    let req: UpdateProjectRequest = parse_body(body)?;

    let project = state
        .services
        .projects
        .update(auth.user_id, project_id, req.into())
        .await?;

    Ok(Json(project))
}

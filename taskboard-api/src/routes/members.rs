/// Project membership endpoints
///
/// # Endpoints
///
/// - `GET /api/projects/:id/members` - Members (any member may list)
/// - `POST /api/projects/:id/members` - Add a member by username (owner only)
/// - `DELETE /api/projects/:id/members/:user_id` - Revoke (owner only)
///
/// The owner is not part of the member list.

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
    models::{ProjectId, UserId, UserSummary},
};
use validator::Validate;

/// Add member request
#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
}

pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthContext,
    path: Result<Path<ProjectId>, PathRejection>,
) -> ApiResult<Json<Vec<UserSummary>>> {
    let Path(project_id) = path?;

    let members = state
        .services
        .projects
        .list_members(auth.user_id, project_id)
        .await?;

    Ok(Json(members))
}

/// Add a member
///
/// Responds `201 Created` with `{ "id", "username" }` of the added user.
///
/// # Errors
///
/// - `400 Bad Request`: already a member (or the owner)
/// - `403 Forbidden`: caller is not the owner
/// - `404 Not Found`: unknown project or username
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthContext,
    path: Result<Path<ProjectId>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserSummary>)> {
    let Path(project_id) = path?;
    let Json(body) = payload?;

    state
        .services
        .projects
        .authorize_owner(auth.user_id, project_id)
        .await?;
    let req: AddMemberRequest = parse_body(body)?;

    let member = state
        .services
        .projects
        .add_member(auth.user_id, project_id, &req.username)
        .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

/// Remove a member; responds `204 No Content`
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthContext,
    path: Result<Path<(ProjectId, UserId)>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path((project_id, user_id)) = path?;

    state
        .services
        .projects
        .remove_member(auth.user_id, project_id, user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

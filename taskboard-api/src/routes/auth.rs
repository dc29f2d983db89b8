/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register new user
/// - `POST /api/auth/login` - Login and get a bearer token
/// - `GET /api/auth/me` - Current user

use crate::{
    app::AppState,
    error::ApiResult,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{jwt, middleware::AuthContext},
    models::UserSummary,
};
use tracing::info;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login name
    #[validate(length(min = 1, max = 100, message = "Username must be 1 to 100 characters"))]
    pub username: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,
}

/// Register a new user
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// { "username": "alice", "password": "secret1" }
/// ```
///
/// Responds `201 Created` with `{ "id": 1, "username": "alice" }`.
///
/// # Errors
///
/// - `400 Bad Request`: validation failed or username taken
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserSummary>)> {
    let Json(req) = payload?;
    req.validate()?;

    let user = state.services.users.register(&req.username, &req.password).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Login endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// { "username": "alice", "password": "secret1" }
/// ```
///
/// Responds `200 OK` with `{ "token": "eyJ..." }`.
///
/// # Errors
///
/// - `400 Bad Request`: malformed body
/// - `401 Unauthorized`: unknown user or wrong password
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let user = state
        .services
        .users
        .authenticate(&req.username, &req.password)
        .await?;

    let token = jwt::issue_token(
        user.id,
        &user.username,
        state.jwt_secret(),
        state.token_lifetime(),
    )?;

    info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse { token }))
}

/// Current user
///
/// ```text
/// GET /api/auth/me
/// Authorization: Bearer <token>
/// ```
pub async fn me(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<UserSummary>> {
    let user = state.services.users.get_user(auth.user_id).await?;
    Ok(Json(user))
}

/// Project membership model
///
/// A membership row grants a non-owner user task-level access to a project.
/// The owner never has a row: ownership is checked against
/// `projects.owner_id` instead.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE project_members (
///     id BIGSERIAL PRIMARY KEY,
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     CONSTRAINT project_members_project_user_key UNIQUE (project_id, user_id)
/// );
/// ```

use serde::{Deserialize, Serialize};

use super::{MembershipId, ProjectId, UserId};

/// Membership model: the (project, user) join row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    pub id: MembershipId,
    pub project_id: ProjectId,
    pub user_id: UserId,
}

/// Input for creating a new membership
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateProjectMember {
    pub project_id: ProjectId,
    pub user_id: UserId,
}

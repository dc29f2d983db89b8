/// Domain models for Taskboard
///
/// Plain data types shared by the store backends, the services and the HTTP
/// layer. Persistence lives in [`crate::store`].
///
/// # Models
///
/// - `user`: accounts with an Argon2id password hash
/// - `project`: owned units of work with an active/archived status
/// - `task`: kanban cards (todo / in_progress / done)
/// - `membership`: (project, user) rows granting non-owner access

pub mod membership;
pub mod project;
pub mod task;
pub mod user;

pub use membership::{CreateProjectMember, ProjectMember};
pub use project::{CreateProject, Project, ProjectStatus, UpdateProject};
pub use task::{CreateTask, Task, TaskStatus, UpdateTask};
pub use user::{CreateUser, User, UserSummary};

pub type UserId = i64;
pub type ProjectId = i64;
pub type TaskId = i64;
pub type MembershipId = i64;

/// Deserializes a field that distinguishes "absent" from "null"
///
/// Use together with `#[serde(default)]`: a missing field yields `None`,
/// an explicit `null` yields `Some(None)`.
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

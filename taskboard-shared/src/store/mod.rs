/// Persistence capability for Taskboard
///
/// [`Store`] is the single storage interface the services depend on. It
/// offers CRUD primitives and entity lookups with no business rules; every
/// write touches exactly one record. The store is constructed once at
/// startup and passed around as `Arc<dyn Store>`.
///
/// # Backends
///
/// - [`postgres::PgStore`]: PostgreSQL via sqlx (production)
/// - [`memory::MemoryStore`]: process-local maps (tests, database-less runs)
///
/// Both backends reject a duplicate username or a duplicate
/// `(project_id, user_id)` membership with [`StoreError::Conflict`], so the
/// service-level "already a member" pre-check is never the only guard.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskboard_shared::models::CreateUser;
/// use taskboard_shared::store::{memory::MemoryStore, Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
/// let user = store
///     .insert_user(CreateUser {
///         username: "alice".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     })
///     .await?;
/// assert!(store.find_user_by_username("alice").await?.is_some());
/// # let _ = user;
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{
    CreateProject, CreateProjectMember, CreateTask, CreateUser, Project, ProjectId, ProjectMember,
    Task, TaskId, UpdateProject, UpdateTask, User, UserId,
};

/// PostgreSQL SQLSTATE for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for foreign key violations
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Record to update does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Uniqueness constraint rejected the write
    #[error("Uniqueness violation: {0}")]
    Conflict(String),

    /// Write references a parent record that does not exist
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Backend failure
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return StoreError::Conflict(constraint),
                Some(FOREIGN_KEY_VIOLATION) => return StoreError::InvalidReference(constraint),
                _ => {}
            }
        }

        StoreError::Database(err)
    }
}

/// Storage interface shared by all backends
///
/// Semantics every implementation must honour:
///
/// - `get_*` / `find_*` return `None` or an empty list for absent records.
/// - `insert_*` assigns a fresh id (never reused) and, for projects and
///   tasks, the creation timestamp.
/// - `update_*` fails with [`StoreError::NotFound`] when the id is absent.
/// - `delete_*` is idempotent and returns whether a record was removed.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name for logs and health output
    fn backend_name(&self) -> &'static str;

    /// Checks that the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    // Users

    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Fails with `Conflict` when the username is taken
    async fn insert_user(&self, data: CreateUser) -> StoreResult<User>;

    // Projects

    async fn get_project(&self, id: ProjectId) -> StoreResult<Option<Project>>;

    async fn insert_project(&self, data: CreateProject) -> StoreResult<Project>;

    async fn update_project(&self, id: ProjectId, data: UpdateProject) -> StoreResult<Project>;

    async fn find_projects_by_owner(&self, owner_id: UserId) -> StoreResult<Vec<Project>>;

    /// Projects for which `user_id` holds a membership row (owners excluded)
    async fn find_projects_by_member_user_id(&self, user_id: UserId)
        -> StoreResult<Vec<Project>>;

    // Memberships

    /// Fails with `Conflict` when the `(project_id, user_id)` pair exists
    async fn insert_membership(&self, data: CreateProjectMember) -> StoreResult<ProjectMember>;

    async fn find_membership(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> StoreResult<Option<ProjectMember>>;

    async fn find_memberships_by_project(
        &self,
        project_id: ProjectId,
    ) -> StoreResult<Vec<ProjectMember>>;

    async fn delete_membership(&self, project_id: ProjectId, user_id: UserId)
        -> StoreResult<bool>;

    // Tasks

    async fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>>;

    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task>;

    async fn update_task(&self, id: TaskId, data: UpdateTask) -> StoreResult<Task>;

    async fn delete_task(&self, id: TaskId) -> StoreResult<bool>;

    async fn find_tasks_by_project(&self, project_id: ProjectId) -> StoreResult<Vec<Task>>;
}

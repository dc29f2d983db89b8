/// PostgreSQL store backend
///
/// Implements [`Store`] on top of a sqlx `PgPool`. Uniqueness and
/// referential integrity are enforced by the schema in `migrations/`;
/// violations surface as [`StoreError::Conflict`] and
/// [`StoreError::InvalidReference`].
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::pool::create_pool;
/// use taskboard_shared::store::{postgres::PgStore, Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(&std::env::var("DATABASE_URL")?, 10).await?;
///
/// let store = PgStore::new(pool);
/// store.ping().await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{Store, StoreError, StoreResult};
use crate::models::{
    CreateProject, CreateProjectMember, CreateTask, CreateUser, Project, ProjectId, ProjectMember,
    Task, TaskId, UpdateProject, UpdateTask, User, UserId,
};

/// Store backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        crate::db::pool::health_check(&self.pool).await?;
        Ok(())
    }

    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert_user(&self, data: CreateUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash
            "#,
        )
        .bind(data.username)
        .bind(data.password_hash)
        .fetch_one(&self.pool)
        .await?;

        debug!(user_id = user.id, "Inserted user");
        Ok(user)
    }

    async fn get_project(&self, id: ProjectId) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, owner_id, status, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn insert_project(&self, data: CreateProject) -> StoreResult<Project> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, owner_id, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, owner_id, status, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.owner_id)
        .bind(data.status)
        .fetch_one(&self.pool)
        .await?;

        debug!(project_id = project.id, owner_id = project.owner_id, "Inserted project");
        Ok(project)
    }

    async fn update_project(&self, id: ProjectId, data: UpdateProject) -> StoreResult<Project> {
        if data.is_empty() {
            return self
                .get_project(id)
                .await?
                .ok_or(StoreError::NotFound { entity: "project", id });
        }

        // Build dynamic update query based on which fields are present
        let mut assignments = Vec::new();
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            assignments.push(format!("name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            assignments.push(format!("description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            assignments.push(format!("status = ${}", bind_count));
        }

        let query = format!(
            "UPDATE projects SET {} WHERE id = $1 \
             RETURNING id, name, description, owner_id, status, created_at",
            assignments.join(", ")
        );

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        q.fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { entity: "project", id })
    }

    async fn find_projects_by_owner(&self, owner_id: UserId) -> StoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, owner_id, status, created_at
            FROM projects
            WHERE owner_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn find_projects_by_member_user_id(
        &self,
        user_id: UserId,
    ) -> StoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.id, p.name, p.description, p.owner_id, p.status, p.created_at
            FROM projects p
            INNER JOIN project_members m ON m.project_id = p.id
            WHERE m.user_id = $1
            ORDER BY p.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn insert_membership(&self, data: CreateProjectMember) -> StoreResult<ProjectMember> {
        let member = sqlx::query_as::<_, ProjectMember>(
            r#"
            INSERT INTO project_members (project_id, user_id)
            VALUES ($1, $2)
            RETURNING id, project_id, user_id
            "#,
        )
        .bind(data.project_id)
        .bind(data.user_id)
        .fetch_one(&self.pool)
        .await?;

        debug!(project_id = member.project_id, user_id = member.user_id, "Inserted membership");
        Ok(member)
    }

    async fn find_membership(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> StoreResult<Option<ProjectMember>> {
        let member = sqlx::query_as::<_, ProjectMember>(
            r#"
            SELECT id, project_id, user_id
            FROM project_members
            WHERE project_id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    async fn find_memberships_by_project(
        &self,
        project_id: ProjectId,
    ) -> StoreResult<Vec<ProjectMember>> {
        let members = sqlx::query_as::<_, ProjectMember>(
            r#"
            SELECT id, project_id, user_id
            FROM project_members
            WHERE project_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    async fn delete_membership(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM project_members
            WHERE project_id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, project_id, assignee_id, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, project_id, assignee_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, status, project_id, assignee_id, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.project_id)
        .bind(data.assignee_id)
        .fetch_one(&self.pool)
        .await?;

        debug!(task_id = task.id, project_id = task.project_id, "Inserted task");
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, data: UpdateTask) -> StoreResult<Task> {
        if data.is_empty() {
            return self
                .get_task(id)
                .await?
                .ok_or(StoreError::NotFound { entity: "task", id });
        }

        let mut assignments = Vec::new();
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            assignments.push(format!("title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            assignments.push(format!("description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            assignments.push(format!("status = ${}", bind_count));
        }
        if data.assignee_id.is_some() {
            bind_count += 1;
            assignments.push(format!("assignee_id = ${}", bind_count));
        }

        let query = format!(
            "UPDATE tasks SET {} WHERE id = $1 \
             RETURNING id, title, description, status, project_id, assignee_id, created_at",
            assignments.join(", ")
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(assignee_id) = data.assignee_id {
            q = q.bind(assignee_id);
        }

        q.fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { entity: "task", id })
    }

    async fn delete_task(&self, id: TaskId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_tasks_by_project(&self, project_id: ProjectId) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, project_id, assignee_id, created_at
            FROM tasks
            WHERE project_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }
}

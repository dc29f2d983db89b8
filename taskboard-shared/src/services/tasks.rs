/// Task operations
///
/// Any member of a project may create, change or delete its tasks. Status
/// moves freely between columns. Permission for an existing task is always
/// evaluated against the task's own `project_id`.

use std::sync::Arc;

use tracing::info;

use super::{required_text, ServiceError, ServiceResult};
use crate::models::{CreateTask, ProjectId, Task, TaskId, TaskStatus, UpdateTask, UserId};
use crate::policy;
use crate::store::Store;

/// Fields for a new task; the project comes from the route
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub assignee_id: Option<UserId>,
}

/// Task operations
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn Store>,
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn require_project(&self, project_id: ProjectId) -> ServiceResult<()> {
        match self.store.get_project(project_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound("Project not found".to_string())),
        }
    }

    async fn load(&self, task_id: TaskId) -> ServiceResult<Task> {
        self.store
            .get_task(task_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))
    }

    async fn check_assignee(&self, assignee_id: UserId) -> ServiceResult<()> {
        if self.store.get_user(assignee_id).await?.is_none() {
            return Err(ServiceError::validation(
                "assigneeId",
                "Assignee does not exist",
            ));
        }
        Ok(())
    }

    /// Loads a task whose project the requester belongs to
    pub async fn authorize(&self, requester: UserId, task_id: TaskId) -> ServiceResult<Task> {
        let task = self.load(task_id).await?;
        policy::require_member(self.store.as_ref(), requester, task.project_id).await?;
        Ok(task)
    }

    /// Tasks of a project the requester belongs to
    pub async fn list(&self, requester: UserId, project_id: ProjectId) -> ServiceResult<Vec<Task>> {
        self.require_project(project_id).await?;
        policy::require_member(self.store.as_ref(), requester, project_id).await?;

        Ok(self.store.find_tasks_by_project(project_id).await?)
    }

    /// Creates a task; status defaults to `todo`
    pub async fn create(
        &self,
        requester: UserId,
        project_id: ProjectId,
        new_task: NewTask,
    ) -> ServiceResult<Task> {
        self.require_project(project_id).await?;
        policy::require_member(self.store.as_ref(), requester, project_id).await?;

        let title = required_text("title", "Title", &new_task.title)?;
        if let Some(assignee_id) = new_task.assignee_id {
            self.check_assignee(assignee_id).await?;
        }

        let task = self
            .store
            .insert_task(CreateTask {
                title,
                description: new_task.description,
                status: new_task.status.unwrap_or_default(),
                project_id,
                assignee_id: new_task.assignee_id,
            })
            .await?;

        info!(task_id = task.id, project_id, "Task created");
        Ok(task)
    }

    /// Applies any subset of title, description, status and assignee
    pub async fn update(
        &self,
        requester: UserId,
        task_id: TaskId,
        mut changes: UpdateTask,
    ) -> ServiceResult<Task> {
        let task = self.authorize(requester, task_id).await?;

        if let Some(title) = changes.title.take() {
            changes.title = Some(required_text("title", "Title", &title)?);
        }
        if let Some(Some(assignee_id)) = changes.assignee_id {
            self.check_assignee(assignee_id).await?;
        }

        let task = self.store.update_task(task_id, changes).await?;
        info!(task_id, status = task.status.as_str(), "Task updated");
        Ok(task)
    }

    /// Deletes a task
    ///
    /// A second delete of the same id fails with `NotFound`.
    pub async fn delete(&self, requester: UserId, task_id: TaskId) -> ServiceResult<()> {
        let task = self.authorize(requester, task_id).await?;

        if !self.store.delete_task(task_id).await? {
            return Err(ServiceError::NotFound("Task not found".to_string()));
        }

        info!(task_id, project_id = task.project_id, "Task deleted");
        Ok(())
    }
}

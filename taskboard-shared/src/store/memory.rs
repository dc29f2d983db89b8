/// In-memory store backend
///
/// Keeps every entity in hash maps behind a single `tokio::sync::RwLock`.
/// Each operation takes the lock once, so a check such as "username already
/// taken" and the insert that follows it are atomic, matching the unique
/// constraints of the PostgreSQL schema.
///
/// Cloning a `MemoryStore` yields a handle to the same data.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Store, StoreError, StoreResult};
use crate::models::{
    CreateProject, CreateProjectMember, CreateTask, CreateUser, MembershipId, Project, ProjectId,
    ProjectMember, Task, TaskId, UpdateProject, UpdateTask, User, UserId,
};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    projects: HashMap<ProjectId, Project>,
    members: HashMap<MembershipId, ProjectMember>,
    tasks: HashMap<TaskId, Task>,
    last_user_id: i64,
    last_project_id: i64,
    last_member_id: i64,
    last_task_id: i64,
}

fn next_id(last: &mut i64) -> i64 {
    *last += 1;
    *last
}

/// Collects values sorted by id so listings are stable between calls
fn sorted_by_id<T: Clone>(items: impl Iterator<Item = T>, id: impl Fn(&T) -> i64) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(|item| id(item));
    items
}

impl MemoryState {
    fn require_user(&self, id: UserId, reference: &str) -> StoreResult<()> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::InvalidReference(reference.to_string()))
        }
    }

    fn require_project(&self, id: ProjectId, reference: &str) -> StoreResult<()> {
        if self.projects.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::InvalidReference(reference.to_string()))
        }
    }
}

/// Store kept entirely in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.username == data.username) {
            return Err(StoreError::Conflict("users_username_key".to_string()));
        }

        let user = User {
            id: next_id(&mut state.last_user_id),
            username: data.username,
            password_hash: data.password_hash,
        };
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn get_project(&self, id: ProjectId) -> StoreResult<Option<Project>> {
        Ok(self.state.read().await.projects.get(&id).cloned())
    }

    async fn insert_project(&self, data: CreateProject) -> StoreResult<Project> {
        let mut state = self.state.write().await;
        state.require_user(data.owner_id, "projects_owner_id_fkey")?;

        let project = Project {
            id: next_id(&mut state.last_project_id),
            name: data.name,
            description: data.description,
            owner_id: data.owner_id,
            status: data.status,
            created_at: Utc::now(),
        };
        state.projects.insert(project.id, project.clone());

        Ok(project)
    }

    async fn update_project(&self, id: ProjectId, data: UpdateProject) -> StoreResult<Project> {
        let mut state = self.state.write().await;
        let project = state
            .projects
            .get_mut(&id)
            .ok_or(StoreError::NotFound { entity: "project", id })?;

        data.apply_to(project);
        Ok(project.clone())
    }

    async fn find_projects_by_owner(&self, owner_id: UserId) -> StoreResult<Vec<Project>> {
        let state = self.state.read().await;
        Ok(sorted_by_id(
            state.projects.values().filter(|p| p.owner_id == owner_id).cloned(),
            |p| p.id,
        ))
    }

    async fn find_projects_by_member_user_id(
        &self,
        user_id: UserId,
    ) -> StoreResult<Vec<Project>> {
        let state = self.state.read().await;
        Ok(sorted_by_id(
            state
                .members
                .values()
                .filter(|m| m.user_id == user_id)
                .filter_map(|m| state.projects.get(&m.project_id))
                .cloned(),
            |p| p.id,
        ))
    }

    async fn insert_membership(&self, data: CreateProjectMember) -> StoreResult<ProjectMember> {
        let mut state = self.state.write().await;
        state.require_project(data.project_id, "project_members_project_id_fkey")?;
        state.require_user(data.user_id, "project_members_user_id_fkey")?;

        if state
            .members
            .values()
            .any(|m| m.project_id == data.project_id && m.user_id == data.user_id)
        {
            return Err(StoreError::Conflict(
                "project_members_project_user_key".to_string(),
            ));
        }

        let member = ProjectMember {
            id: next_id(&mut state.last_member_id),
            project_id: data.project_id,
            user_id: data.user_id,
        };
        state.members.insert(member.id, member.clone());

        Ok(member)
    }

    async fn find_membership(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> StoreResult<Option<ProjectMember>> {
        let state = self.state.read().await;
        Ok(state
            .members
            .values()
            .find(|m| m.project_id == project_id && m.user_id == user_id)
            .cloned())
    }

    async fn find_memberships_by_project(
        &self,
        project_id: ProjectId,
    ) -> StoreResult<Vec<ProjectMember>> {
        let state = self.state.read().await;
        Ok(sorted_by_id(
            state.members.values().filter(|m| m.project_id == project_id).cloned(),
            |m| m.id,
        ))
    }

    async fn delete_membership(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.members.len();
        state
            .members
            .retain(|_, m| !(m.project_id == project_id && m.user_id == user_id));

        Ok(state.members.len() < before)
    }

    async fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        Ok(self.state.read().await.tasks.get(&id).cloned())
    }

    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task> {
        let mut state = self.state.write().await;
        state.require_project(data.project_id, "tasks_project_id_fkey")?;
        if let Some(assignee_id) = data.assignee_id {
            state.require_user(assignee_id, "tasks_assignee_id_fkey")?;
        }

        let task = Task {
            id: next_id(&mut state.last_task_id),
            title: data.title,
            description: data.description,
            status: data.status,
            project_id: data.project_id,
            assignee_id: data.assignee_id,
            created_at: Utc::now(),
        };
        state.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn update_task(&self, id: TaskId, data: UpdateTask) -> StoreResult<Task> {
        let mut state = self.state.write().await;
        if let Some(Some(assignee_id)) = data.assignee_id {
            state.require_user(assignee_id, "tasks_assignee_id_fkey")?;
        }

        let task = state
            .tasks
            .get_mut(&id)
            .ok_or(StoreError::NotFound { entity: "task", id })?;

        data.apply_to(task);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: TaskId) -> StoreResult<bool> {
        Ok(self.state.write().await.tasks.remove(&id).is_some())
    }

    async fn find_tasks_by_project(&self, project_id: ProjectId) -> StoreResult<Vec<Task>> {
        let state = self.state.read().await;
        Ok(sorted_by_id(
            state.tasks.values().filter(|t| t.project_id == project_id).cloned(),
            |t| t.id,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectStatus, TaskStatus};

    async fn user(store: &MemoryStore, username: &str) -> User {
        store
            .insert_user(CreateUser {
                username: username.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
    }

    async fn project(store: &MemoryStore, owner_id: UserId) -> Project {
        store
            .insert_project(CreateProject {
                name: "P1".to_string(),
                description: None,
                owner_id,
                status: ProjectStatus::Active,
            })
            .await
            .unwrap()
    }

    fn new_task(project_id: ProjectId) -> CreateTask {
        CreateTask {
            title: "T1".to_string(),
            description: None,
            status: TaskStatus::Todo,
            project_id,
            assignee_id: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryStore::new();
        user(&store, "alice").await;

        let result = store
            .insert_user(CreateUser {
                username: "alice".to_string(),
                password_hash: "other".to_string(),
            })
            .await;

        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let p = project(&store, alice.id).await;

        let first = store.insert_task(new_task(p.id)).await.unwrap();
        assert!(store.delete_task(first.id).await.unwrap());
        let second = store.insert_task(new_task(p.id)).await.unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_duplicate_membership_rejected_at_store_level() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let p = project(&store, alice.id).await;

        let data = CreateProjectMember { project_id: p.id, user_id: bob.id };
        store.insert_membership(data).await.unwrap();

        let result = store.insert_membership(data).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(store.find_memberships_by_project(p.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_references_are_checked() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;

        let result = store.insert_task(new_task(42)).await;
        assert!(matches!(result, Err(StoreError::InvalidReference(_))));

        let result = store
            .insert_membership(CreateProjectMember { project_id: 42, user_id: alice.id })
            .await;
        assert!(matches!(result, Err(StoreError::InvalidReference(_))));
    }

    #[tokio::test]
    async fn test_update_missing_records() {
        let store = MemoryStore::new();

        let result = store.update_task(5, UpdateTask::default()).await;
        assert!(matches!(result, Err(StoreError::NotFound { entity: "task", id: 5 })));

        let result = store.update_project(5, UpdateProject::default()).await;
        assert!(matches!(result, Err(StoreError::NotFound { entity: "project", .. })));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let p = project(&store, alice.id).await;
        let task = store.insert_task(new_task(p.id)).await.unwrap();

        assert!(store.delete_task(task.id).await.unwrap());
        assert!(!store.delete_task(task.id).await.unwrap());
        assert!(store.get_task(task.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_member_projects_lookup() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let p = project(&store, alice.id).await;

        assert!(store.find_projects_by_member_user_id(bob.id).await.unwrap().is_empty());

        store
            .insert_membership(CreateProjectMember { project_id: p.id, user_id: bob.id })
            .await
            .unwrap();

        let projects = store.find_projects_by_member_user_id(bob.id).await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, p.id);

        assert!(store.delete_membership(p.id, bob.id).await.unwrap());
        assert!(!store.delete_membership(p.id, bob.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let handle = store.clone();
        user(&store, "alice").await;

        assert!(handle.find_user_by_username("alice").await.unwrap().is_some());
    }
}

/// Project and membership operations
///
/// Only the owner may change a project or its member list; any member may
/// read it. Owners never get a membership row, so "already a member" also
/// covers adding the owner.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use super::{required_text, ServiceError, ServiceResult};
use crate::models::{
    CreateProject, CreateProjectMember, Project, ProjectId, ProjectStatus, UpdateProject, UserId,
    UserSummary,
};
use crate::policy;
use crate::store::Store;

/// Project operations
#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn Store>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn load(&self, project_id: ProjectId) -> ServiceResult<Project> {
        self.store
            .get_project(project_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Project not found".to_string()))
    }

    /// Loads a project the requester owns
    ///
    /// `NotFound` is reported before `Forbidden`.
    pub async fn authorize_owner(
        &self,
        requester: UserId,
        project_id: ProjectId,
    ) -> ServiceResult<Project> {
        let project = self.load(project_id).await?;
        policy::require_owner(self.store.as_ref(), requester, project_id).await?;
        Ok(project)
    }

    /// Creates an active project owned by `owner_id`
    pub async fn create(
        &self,
        owner_id: UserId,
        name: &str,
        description: Option<String>,
    ) -> ServiceResult<Project> {
        let name = required_text("name", "Name", name)?;

        let project = self
            .store
            .insert_project(CreateProject {
                name,
                description,
                owner_id,
                status: ProjectStatus::Active,
            })
            .await?;

        info!(project_id = project.id, owner_id, "Project created");
        Ok(project)
    }

    /// Returns a project the requester is a member of
    pub async fn get(&self, requester: UserId, project_id: ProjectId) -> ServiceResult<Project> {
        let project = self.load(project_id).await?;
        policy::require_member(self.store.as_ref(), requester, project_id).await?;
        Ok(project)
    }

    /// Applies a partial update; owner only
    ///
    /// An empty update returns the project unchanged.
    pub async fn update(
        &self,
        requester: UserId,
        project_id: ProjectId,
        mut changes: UpdateProject,
    ) -> ServiceResult<Project> {
        self.authorize_owner(requester, project_id).await?;

        if let Some(name) = changes.name.take() {
            changes.name = Some(required_text("name", "Name", &name)?);
        }

        let project = self.store.update_project(project_id, changes).await?;
        info!(project_id, status = project.status.as_str(), "Project updated");
        Ok(project)
    }

    /// Owned projects plus projects with a membership row, without duplicates
    pub async fn list_for_user(&self, user_id: UserId) -> ServiceResult<Vec<Project>> {
        let owned = self.store.find_projects_by_owner(user_id).await?;
        let joined = self.store.find_projects_by_member_user_id(user_id).await?;

        let mut seen = HashSet::new();
        Ok(owned
            .into_iter()
            .chain(joined)
            .filter(|project| seen.insert(project.id))
            .collect())
    }

    /// Adds the user named `username` as a member; owner only
    ///
    /// # Errors
    ///
    /// - `NotFound` when the project or the username does not exist
    /// - `Forbidden` unless the requester owns the project
    /// - `Conflict` when the user is the owner or already a member
    pub async fn add_member(
        &self,
        requester: UserId,
        project_id: ProjectId,
        username: &str,
    ) -> ServiceResult<UserSummary> {
        self.authorize_owner(requester, project_id).await?;

        let username = required_text("username", "Username", username)?;
        let user = self
            .store
            .find_user_by_username(&username)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        if policy::is_member(self.store.as_ref(), user.id, project_id).await? {
            return Err(ServiceError::Conflict("User is already a member".to_string()));
        }

        // The unique (project_id, user_id) constraint settles concurrent adds
        self.store
            .insert_membership(CreateProjectMember {
                project_id,
                user_id: user.id,
            })
            .await?;

        info!(project_id, user_id = user.id, "Member added");
        Ok(UserSummary::from(user))
    }

    /// Users holding a membership row; the owner is not listed
    pub async fn list_members(
        &self,
        requester: UserId,
        project_id: ProjectId,
    ) -> ServiceResult<Vec<UserSummary>> {
        self.load(project_id).await?;
        policy::require_member(self.store.as_ref(), requester, project_id).await?;

        let memberships = self.store.find_memberships_by_project(project_id).await?;

        let mut members = Vec::with_capacity(memberships.len());
        for membership in memberships {
            if let Some(user) = self.store.get_user(membership.user_id).await? {
                members.push(UserSummary::from(user));
            }
        }

        Ok(members)
    }

    /// Revokes a membership; owner only
    pub async fn remove_member(
        &self,
        requester: UserId,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ServiceResult<()> {
        self.authorize_owner(requester, project_id).await?;

        if !self.store.delete_membership(project_id, user_id).await? {
            return Err(ServiceError::NotFound(
                "User is not a member of this project".to_string(),
            ));
        }

        info!(project_id, user_id, "Member removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateUser;
    use crate::store::memory::MemoryStore;

    struct Fixture {
        projects: ProjectService,
        store: Arc<dyn Store>,
        alice: UserId,
        bob: UserId,
    }

    async fn fixture() -> Fixture {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let mut ids = Vec::new();
        for name in ["alice", "bob"] {
            let user = store
                .insert_user(CreateUser {
                    username: name.to_string(),
                    password_hash: "hash".to_string(),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }

        Fixture {
            projects: ProjectService::new(store.clone()),
            store,
            alice: ids[0],
            bob: ids[1],
        }
    }

    #[tokio::test]
    async fn test_create_project() {
        let f = fixture().await;

        let project = f
            .projects
            .create(f.alice, "  P1 ", Some("first".to_string()))
            .await
            .unwrap();

        assert_eq!(project.name, "P1");
        assert_eq!(project.owner_id, f.alice);
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.description.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_create_project_requires_name() {
        let f = fixture().await;

        let result = f.projects.create(f.alice, "", None).await;
        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_only_owner_updates() {
        let f = fixture().await;
        let project = f.projects.create(f.alice, "P1", None).await.unwrap();
        f.projects.add_member(f.alice, project.id, "bob").await.unwrap();

        let changes = UpdateProject {
            status: Some(ProjectStatus::Archived),
            ..Default::default()
        };
        let result = f.projects.update(f.bob, project.id, changes.clone()).await;
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));

        let updated = f.projects.update(f.alice, project.id, changes).await.unwrap();
        assert_eq!(updated.status, ProjectStatus::Archived);
        assert_eq!(updated.name, "P1");
    }

    #[tokio::test]
    async fn test_update_checks_existence_first() {
        let f = fixture().await;

        let result = f.projects.update(f.bob, 404, UpdateProject::default()).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_authorize_owner() {
        let f = fixture().await;
        let project = f.projects.create(f.alice, "P1", None).await.unwrap();
        f.projects.add_member(f.alice, project.id, "bob").await.unwrap();

        let owned = f.projects.authorize_owner(f.alice, project.id).await.unwrap();
        assert_eq!(owned.id, project.id);

        let result = f.projects.authorize_owner(f.bob, project.id).await;
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));

        let result = f.projects.authorize_owner(f.bob, 404).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_clears_description() {
        let f = fixture().await;
        let project = f
            .projects
            .create(f.alice, "P1", Some("temp".to_string()))
            .await
            .unwrap();

        let changes = UpdateProject {
            description: Some(None),
            ..Default::default()
        };
        let updated = f.projects.update(f.alice, project.id, changes).await.unwrap();
        assert!(updated.description.is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_blank_name() {
        let f = fixture().await;
        let project = f.projects.create(f.alice, "P1", None).await.unwrap();

        let changes = UpdateProject {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        let result = f.projects.update(f.alice, project.id, changes).await;
        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_get_requires_membership() {
        let f = fixture().await;
        let project = f.projects.create(f.alice, "P1", None).await.unwrap();

        assert!(matches!(
            f.projects.get(f.bob, project.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            f.projects.get(f.bob, 404).await,
            Err(ServiceError::NotFound(_))
        ));

        f.projects.add_member(f.alice, project.id, "bob").await.unwrap();
        assert_eq!(f.projects.get(f.bob, project.id).await.unwrap().id, project.id);
    }

    #[tokio::test]
    async fn test_list_for_user_deduplicates() {
        let f = fixture().await;
        let own = f.projects.create(f.alice, "Own", None).await.unwrap();
        let shared = f.projects.create(f.bob, "Shared", None).await.unwrap();
        f.projects.add_member(f.bob, shared.id, "alice").await.unwrap();

        // Stray membership row for a project alice already owns
        f.store
            .insert_membership(CreateProjectMember {
                project_id: own.id,
                user_id: f.alice,
            })
            .await
            .unwrap();

        let mut ids: Vec<_> = f
            .projects
            .list_for_user(f.alice)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        ids.sort();

        assert_eq!(ids, vec![own.id, shared.id]);
    }

    #[tokio::test]
    async fn test_add_member_rules() {
        let f = fixture().await;
        let project = f.projects.create(f.alice, "P1", None).await.unwrap();

        let added = f.projects.add_member(f.alice, project.id, "bob").await.unwrap();
        assert_eq!(added.username, "bob");

        assert!(matches!(
            f.projects.add_member(f.alice, project.id, "bob").await,
            Err(ServiceError::Conflict(_))
        ));
        assert!(matches!(
            f.projects.add_member(f.alice, project.id, "alice").await,
            Err(ServiceError::Conflict(_))
        ));
        assert!(matches!(
            f.projects.add_member(f.alice, project.id, "carol").await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            f.projects.add_member(f.bob, project.id, "alice").await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_list_members() {
        let f = fixture().await;
        let project = f.projects.create(f.alice, "P1", None).await.unwrap();

        assert!(f.projects.list_members(f.alice, project.id).await.unwrap().is_empty());
        assert!(matches!(
            f.projects.list_members(f.bob, project.id).await,
            Err(ServiceError::Forbidden(_))
        ));

        f.projects.add_member(f.alice, project.id, "bob").await.unwrap();
        let members = f.projects.list_members(f.bob, project.id).await.unwrap();
        assert_eq!(
            members,
            vec![UserSummary {
                id: f.bob,
                username: "bob".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_remove_member() {
        let f = fixture().await;
        let project = f.projects.create(f.alice, "P1", None).await.unwrap();
        f.projects.add_member(f.alice, project.id, "bob").await.unwrap();

        assert!(matches!(
            f.projects.remove_member(f.bob, project.id, f.bob).await,
            Err(ServiceError::Forbidden(_))
        ));

        f.projects.remove_member(f.alice, project.id, f.bob).await.unwrap();
        assert!(matches!(
            f.projects.get(f.bob, project.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            f.projects.remove_member(f.alice, project.id, f.bob).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}

/// Project access policy
///
/// Two predicates decide every permission in Taskboard:
///
/// - **owner**: the user is the project's `owner_id`
/// - **member**: the user is the owner, or holds a membership row
///
/// Owners are never stored in the membership table, so both sources are
/// consulted. Nothing is cached; a revoked membership is visible on the
/// next call. Absent projects yield `false`.
///
/// # Example
///
/// ```
/// use taskboard_shared::policy::is_member;
/// use taskboard_shared::store::memory::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// assert!(!is_member(&store, 1, 99).await?);
/// # Ok(())
/// # }
/// ```

use tracing::warn;

use crate::models::{ProjectId, UserId};
use crate::services::{ServiceError, ServiceResult};
use crate::store::{Store, StoreResult};

/// True iff the project exists and `user_id` owns it
pub async fn is_owner(
    store: &dyn Store,
    user_id: UserId,
    project_id: ProjectId,
) -> StoreResult<bool> {
    Ok(store
        .get_project(project_id)
        .await?
        .is_some_and(|project| project.owner_id == user_id))
}

/// True iff the project exists and `user_id` owns it or holds a membership
pub async fn is_member(
    store: &dyn Store,
    user_id: UserId,
    project_id: ProjectId,
) -> StoreResult<bool> {
    let Some(project) = store.get_project(project_id).await? else {
        return Ok(false);
    };

    if project.owner_id == user_id {
        return Ok(true);
    }

    Ok(store.find_membership(project_id, user_id).await?.is_some())
}

/// Fails with `Forbidden` unless `user_id` owns the project
pub async fn require_owner(
    store: &dyn Store,
    user_id: UserId,
    project_id: ProjectId,
) -> ServiceResult<()> {
    if is_owner(store, user_id, project_id).await? {
        Ok(())
    } else {
        warn!(user_id, project_id, "Owner check failed");
        Err(ServiceError::Forbidden(
            "Only the project owner can perform this action".to_string(),
        ))
    }
}

/// Fails with `Forbidden` unless `user_id` is a member of the project
pub async fn require_member(
    store: &dyn Store,
    user_id: UserId,
    project_id: ProjectId,
) -> ServiceResult<()> {
    if is_member(store, user_id, project_id).await? {
        Ok(())
    } else {
        warn!(user_id, project_id, "Membership check failed");
        Err(ServiceError::Forbidden(
            "Not a member of this project".to_string(),
        ))
    }
}

/// Entity services
///
/// Each service wraps [`Store`] calls with the access policy and input
/// validation. Services hold no state of their own beyond the shared store
/// handle, so they are cheap to clone into request handlers.
///
/// # Check order
///
/// For operations addressed at a project or task:
///
/// 1. existence (`NotFound`)
/// 2. authorization (`Forbidden`)
/// 3. payload validation (`Validation`)
///
/// Store errors are translated, never swallowed.

pub mod projects;
pub mod tasks;
pub mod users;

use std::sync::Arc;

use tracing::error;

pub use projects::ProjectService;
pub use tasks::{NewTask, TaskService};
pub use users::UserService;

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::store::{Store, StoreError};

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error type for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed or missing input
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Missing or wrong credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but lacking permission
    #[error("{0}")]
    Forbidden(String),

    /// Addressed entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness rule violated
    #[error("{0}")]
    Conflict(String),

    /// Unexpected failure; the message is for logs only
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Validation error tied to a request field
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => {
                ServiceError::NotFound(format!("{} {} not found", capitalize(entity), id))
            }
            StoreError::Conflict(constraint) => match constraint.as_str() {
                "users_username_key" => {
                    ServiceError::Conflict("Username already exists".to_string())
                }
                "project_members_project_user_key" => {
                    ServiceError::Conflict("User is already a member".to_string())
                }
                _ => ServiceError::Conflict("Record already exists".to_string()),
            },
            // A referenced row vanished between the service check and the write
            StoreError::InvalidReference(reference) => ServiceError::Validation {
                message: format!("Referenced record does not exist ({})", reference),
                field: None,
            },
            StoreError::Database(e) => {
                error!(error = %e, "Store operation failed");
                ServiceError::Internal(e.to_string())
            }
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        error!(error = %err, "Password hashing failed");
        ServiceError::Internal(err.to_string())
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        error!(error = %err, "Token handling failed");
        ServiceError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        error!(error = %err, "Blocking task failed");
        ServiceError::Internal(err.to_string())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Trims a required text field, rejecting empty values
pub(crate) fn required_text(field: &str, label: &str, value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(field, format!("{} is required", label)));
    }
    Ok(trimmed.to_string())
}

/// All entity services over one store
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub projects: ProjectService,
    pub tasks: TaskService,
    store: Arc<dyn Store>,
}

impl Services {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            users: UserService::new(store.clone()),
            projects: ProjectService::new(store.clone()),
            tasks: TaskService::new(store.clone()),
            store,
        }
    }

    /// The underlying store, for health checks
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_translation() {
        let err: ServiceError = StoreError::NotFound { entity: "task", id: 9 }.into();
        assert!(matches!(&err, ServiceError::NotFound(msg) if msg == "Task 9 not found"));
    }

    #[test]
    fn test_store_conflict_translation() {
        let err: ServiceError = StoreError::Conflict("users_username_key".to_string()).into();
        assert!(matches!(&err, ServiceError::Conflict(msg) if msg == "Username already exists"));

        let err: ServiceError =
            StoreError::Conflict("project_members_project_user_key".to_string()).into();
        assert!(matches!(&err, ServiceError::Conflict(msg) if msg == "User is already a member"));
    }

    #[test]
    fn test_invalid_reference_is_validation() {
        let err: ServiceError =
            StoreError::InvalidReference("tasks_assignee_id_fkey".into()).into();
        assert!(matches!(err, ServiceError::Validation { field: None, .. }));
    }

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("name", "Name", "  P1 ").unwrap(), "P1");

        match required_text("name", "Name", "   ") {
            Err(ServiceError::Validation { message, field }) => {
                assert_eq!(message, "Name is required");
                assert_eq!(field.as_deref(), Some("name"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}

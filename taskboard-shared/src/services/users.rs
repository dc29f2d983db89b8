/// User registration and authentication
///
/// Argon2id hashing is CPU-bound, so hashing and verification run on the
/// blocking thread pool.

use std::sync::Arc;

use tracing::{debug, info};

use super::{required_text, ServiceError, ServiceResult};
use crate::auth::password::{hash_password, validate_password, verify_password};
use crate::models::{CreateUser, User, UserId, UserSummary};
use crate::store::Store;

/// Account operations
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Registers a new user
    ///
    /// The username is trimmed. Only the password hash is stored, and the
    /// returned summary carries no credential fields.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty username or a password shorter than 6
    /// - `Conflict` when the username is taken
    pub async fn register(&self, username: &str, password: &str) -> ServiceResult<UserSummary> {
        let username = required_text("username", "Username", username)?;
        validate_password(password).map_err(|msg| ServiceError::validation("password", msg))?;

        if self.store.find_user_by_username(&username).await?.is_some() {
            return Err(ServiceError::Conflict("Username already exists".to_string()));
        }

        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

        // The store's unique constraint catches a concurrent registration
        let user = self
            .store
            .insert_user(CreateUser {
                username,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(UserSummary::from(user))
    }

    /// Checks credentials and returns the user
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<User> {
        let invalid = || ServiceError::Unauthorized("Invalid credentials".to_string());

        let user = self
            .store
            .find_user_by_username(username.trim())
            .await?
            .ok_or_else(invalid)?;

        let password = password.to_string();
        let hash = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await??;

        if !matches {
            debug!(user_id = user.id, "Password mismatch");
            return Err(invalid());
        }

        Ok(user)
    }

    /// Looks up the caller of an authenticated request
    ///
    /// A token can outlive its user only if the row was removed out of band;
    /// that case is treated as invalid credentials.
    pub async fn get_user(&self, user_id: UserId) -> ServiceResult<UserSummary> {
        self.store
            .get_user(user_id)
            .await?
            .map(UserSummary::from)
            .ok_or_else(|| ServiceError::Unauthorized("User not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn service() -> (UserService, Arc<dyn Store>) {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        (UserService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let (users, store) = service();

        let summary = users.register("alice", "secret1").await.unwrap();
        assert_eq!(summary.username, "alice");

        let stored = store.get_user(summary.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "secret1");
        assert!(stored.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let (users, _) = service();
        users.register("alice", "secret1").await.unwrap();

        let result = users.register("alice", "another1").await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));

        // Trimming makes these the same name
        let result = users.register("  alice ", "another1").await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let (users, _) = service();

        match users.register("   ", "secret1").await {
            Err(ServiceError::Validation { field, .. }) => {
                assert_eq!(field.as_deref(), Some("username"))
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        match users.register("alice", "123").await {
            Err(ServiceError::Validation { field, .. }) => {
                assert_eq!(field.as_deref(), Some("password"))
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_authenticate() {
        let (users, _) = service();
        let registered = users.register("alice", "secret1").await.unwrap();

        let user = users.authenticate("alice", "secret1").await.unwrap();
        assert_eq!(user.id, registered.id);

        assert!(matches!(
            users.authenticate("alice", "wrong").await,
            Err(ServiceError::Unauthorized(_))
        ));
        assert!(matches!(
            users.authenticate("nobody", "secret1").await,
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_get_user() {
        let (users, _) = service();
        let registered = users.register("alice", "secret1").await.unwrap();

        assert_eq!(users.get_user(registered.id).await.unwrap(), registered);
        assert!(matches!(
            users.get_user(999).await,
            Err(ServiceError::Unauthorized(_))
        ));
    }
}

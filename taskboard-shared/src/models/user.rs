/// User model
///
/// Users are created at registration and never edited afterwards. A user can
/// own any number of projects and be a member of many more.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     username TEXT NOT NULL,
///     password_hash TEXT NOT NULL,
///     CONSTRAINT users_username_key UNIQUE (username)
/// );
/// ```

use serde::{Deserialize, Serialize};

use super::UserId;

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext. The hash is
/// skipped during serialization so a `User` can never leak it into a
/// response body; use [`UserSummary`] for the public projection.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: UserId,

    /// Login name, unique across all users
    pub username: String,

    /// Argon2id password hash (PHC string)
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Login name
    pub username: String,

    /// Argon2id password hash (NOT the plaintext password!)
    pub password_hash: String,
}

/// Public view of a user: id and username only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

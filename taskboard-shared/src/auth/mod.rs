/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and the minimum password rule
/// - [`jwt`]: HS256 bearer token issuing and validation
/// - [`middleware`]: Axum middleware and the `AuthContext` extractor
///
/// Permission checks live in [`crate::policy`].
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::jwt::{create_token, validate_token, Claims};
/// use taskboard_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("secret1")?;
/// assert!(verify_password("secret1", &hash)?);
///
/// let token = create_token(&Claims::new(1, "alice"), "secret-key")?;
/// assert_eq!(validate_token(&token, "secret-key")?.username, "alice");
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;

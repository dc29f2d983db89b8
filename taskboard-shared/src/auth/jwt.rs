/// Bearer token signing and validation
///
/// Tokens are HS256 JWTs carrying the user's id (`sub`) and username. They
/// are issued at login and stay valid for a fixed window (24 hours by
/// default). Signing and verification are delegated to `jsonwebtoken`.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(42, "alice");
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated.user_id()?, 42);
/// assert_eq!(validated.username, "alice");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::UserId;

/// Issuer claim stamped on every token
pub const ISSUER: &str = "taskboard";

/// Default token validity window in hours
pub const DEFAULT_EXPIRATION_HOURS: i64 = 24;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format or claim validation failed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Issuer does not match
    #[error("Invalid issuer")]
    InvalidIssuer,

    /// Subject is not a user id
    #[error("Invalid subject: {0}")]
    InvalidSubject(String),
}

/// JWT claims
///
/// - `sub`: user id (decimal string, per the JWT convention)
/// - `username`: login name at issue time
/// - `iss`: always [`ISSUER`]
/// - `iat` / `nbf` / `exp`: Unix timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    /// Creates claims valid for [`DEFAULT_EXPIRATION_HOURS`]
    pub fn new(user_id: UserId, username: impl Into<String>) -> Self {
        Self::with_expiration(user_id, username, Duration::hours(DEFAULT_EXPIRATION_HOURS))
    }

    /// Creates claims with a custom validity window
    ///
    /// A negative duration produces an already-expired token (useful in
    /// tests).
    pub fn with_expiration(
        user_id: UserId,
        username: impl Into<String>,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id.to_string(),
            username: username.into(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Parses the subject back into a user id
    pub fn user_id(&self) -> Result<UserId, JwtError> {
        self.sub
            .parse()
            .map_err(|_| JwtError::InvalidSubject(self.sub.clone()))
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims with HS256
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates signature, expiry, not-before and issuer, returning the claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Issues a token for a user in one step
pub fn issue_token(
    user_id: UserId,
    username: &str,
    secret: &str,
    expires_in: Duration,
) -> Result<String, JwtError> {
    create_token(&Claims::with_expiration(user_id, username, expires_in), secret)
}

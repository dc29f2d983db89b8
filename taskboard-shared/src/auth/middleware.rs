/// Bearer token authentication for Axum
///
/// [`authenticate`] validates `Authorization: Bearer <token>` headers. The
/// router's auth layer stores the resulting [`AuthContext`] in the request
/// extensions, and handlers take `AuthContext` directly as an extractor.
///
/// # Status codes
///
/// - Missing header, or a header without a bearer token: 401
/// - Token present but invalid or expired: 403
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap};
/// use taskboard_shared::auth::jwt::{create_token, Claims};
/// use taskboard_shared::auth::middleware::authenticate;
///
/// let token = create_token(&Claims::new(1, "alice"), "secret-key").unwrap();
/// let mut headers = HeaderMap::new();
/// headers.insert(header::AUTHORIZATION, format!("Bearer {}", token).parse().unwrap());
///
/// assert_eq!(authenticate(&headers, "secret-key").unwrap().user_id, 1);
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_token, JwtError};
use crate::models::UserId;

/// Authenticated caller, added to request extensions by the middleware
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: UserId,
    pub username: String,
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header or bearer token
    MissingCredentials,

    /// Token failed validation
    InvalidToken(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken(_) => StatusCode::FORBIDDEN,
        }
    }

    pub fn message(&self) -> String {
        match self {
            AuthError::MissingCredentials => "Access token required".to_string(),
            AuthError::InvalidToken(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = if status == StatusCode::UNAUTHORIZED {
            "unauthorized"
        } else {
            "forbidden"
        };
        let body = serde_json::json!({
            "error": error,
            "message": self.message(),
        });

        (status, Json(body)).into_response()
    }
}

/// Resolves the caller from request headers
///
/// Only the `Bearer` scheme is accepted; any other scheme counts as missing
/// credentials.
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingCredentials)?;

    let claims = validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken("Invalid token".to_string()),
    })?;

    let user_id = claims
        .user_id()
        .map_err(|_| AuthError::InvalidToken("Invalid token".to_string()))?;

    Ok(AuthContext {
        user_id,
        username: claims.username,
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only present when the route sits behind the JWT middleware
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, Claims};
    use axum::http::HeaderValue;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_authenticate_valid_token() {
        let token = create_token(&Claims::new(3, "alice"), SECRET).unwrap();
        let auth = authenticate(&headers_with(&format!("Bearer {}", token)), SECRET).unwrap();

        assert_eq!(auth.user_id, 3);
        assert_eq!(auth.username, "alice");
    }

    #[test]
    fn test_authenticate_missing_header() {
        let err = authenticate(&HeaderMap::new(), SECRET).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_authenticate_empty_bearer() {
        let err = authenticate(&headers_with("Bearer "), SECRET).unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }

    #[test]
    fn test_authenticate_other_scheme() {
        let err = authenticate(&headers_with("Basic YWxpY2U6c2VjcmV0"), SECRET).unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }

    #[test]
    fn test_authenticate_invalid_token() {
        let err = authenticate(&headers_with("Bearer garbage"), SECRET).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_authenticate_expired_token() {
        let claims = Claims::with_expiration(3, "alice", Duration::hours(-2));
        let token = create_token(&claims, SECRET).unwrap();

        let err = authenticate(&headers_with(&format!("Bearer {}", token)), SECRET).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "Token expired");
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidToken("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

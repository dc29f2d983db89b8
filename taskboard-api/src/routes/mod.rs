/// API route handlers
///
/// Handlers parse the request, call one service operation and map the
/// result to a status code. Business rules live in
/// `taskboard_shared::services`.
///
/// Handlers addressing an existing project or task accept the body as raw
/// JSON and only decode it into the typed request after the caller has
/// been authorized; see [`parse_body`].
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login and the current user
/// - `projects`: Project CRUD
/// - `members`: Project membership
/// - `tasks`: Tasks within a project

pub mod auth;
pub mod health;
pub mod members;
pub mod projects;
pub mod tasks;

use crate::error::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

/// Decodes a syntactically valid JSON body and applies its field rules
pub(crate) fn parse_body<T>(body: Value) -> ApiResult<T>
where
    T: DeserializeOwned + Validate,
{
    let req: T = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?;
    req.validate()?;
    Ok(req)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Title is required"))]
        title: String,
    }

    #[test]
    fn test_parse_body() {
        let sample: Sample = parse_body(json!({ "title": "T1" })).unwrap();
        assert_eq!(sample.title, "T1");

        match parse_body::<Sample>(json!({ "title": "" })) {
            Err(ApiError::ValidationError { field, .. }) => {
                assert_eq!(field.as_deref(), Some("title"))
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(matches!(
            parse_body::<Sample>(json!({ "title": 7 })),
            Err(ApiError::BadRequest(_))
        ));
    }
}

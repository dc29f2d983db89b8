/// Common test utilities for integration tests
///
/// Builds the full router over a fresh `MemoryStore`, so tests need no
/// database, and offers small helpers for JSON requests and logging in.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::{ApiConfig, Config, JwtConfig, StorageBackend};
use taskboard_shared::store::{memory::MemoryStore, Store};
use tower::Service as _;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing the router and its store
#[allow(dead_code)]
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<dyn Store>,
    pub config: Config,
}

/// A registered, logged-in user
#[allow(dead_code)]
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub token: String,
}

impl TestContext {
    pub fn new() -> Self {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            storage: StorageBackend::Memory,
            database: None,
            jwt: JwtConfig {
                secret: TEST_SECRET.to_string(),
                expiration_hours: 24,
            },
            seed_demo_data: false,
        };

        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), config.clone());

        Self {
            app: build_router(state),
            store,
            config,
        }
    }

    /// Sends a request and returns the status with the parsed JSON body
    ///
    /// Empty bodies come back as `Value::Null`.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    /// Sends a prepared request
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!(
                    "Expected JSON body, got {}: {}",
                    status,
                    String::from_utf8_lossy(&bytes)
                )
            })
        };

        (status, value)
    }

    /// Registers `username` with password `secret1` and logs in
    pub async fn user(&self, username: &str) -> TestUser {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "username": username, "password": "secret1" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        let id = body["id"].as_i64().unwrap();

        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "username": username, "password": "secret1" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        TestUser {
            id,
            username: username.to_string(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Creates a project and returns its id
    pub async fn project(&self, owner: &TestUser, name: &str) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/projects",
                Some(&owner.token),
                Some(json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create project failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    /// Creates a task and returns its id
    pub async fn task(&self, user: &TestUser, project_id: i64, title: &str) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                &format!("/api/projects/{}/tasks", project_id),
                Some(&user.token),
                Some(json!({ "title": title })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create task failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    /// Adds `member` to the project as `owner`
    pub async fn add_member(&self, owner: &TestUser, project_id: i64, member: &TestUser) {
        let (status, body) = self
            .send(
                Method::POST,
                &format!("/api/projects/{}/members", project_id),
                Some(&owner.token),
                Some(json!({ "username": member.username })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add member failed: {}", body);
    }
}

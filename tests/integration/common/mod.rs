//! Common test utilities and fixtures for integration tests
//!
//! This module provides shared infrastructure for all integration tests:
//! - In-memory application wiring with a recording event sink
//! - User fixtures
//! - Request builders and response parsing

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use taskboard_events::mock::MockEventSink;
use taskboard_projects::{
    Entity, InMemoryStore, ProjectService, ProjectsRepositories, User, UserRole,
};

/// Test application over in-memory stores
pub struct TestApp {
    pub store: InMemoryStore,
    pub events: MockEventSink,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let events = MockEventSink::new();
        let service = ProjectService::new(
            ProjectsRepositories::in_memory(store.clone()),
            Arc::new(events.clone()),
        );

        Self {
            store,
            events,
            router: taskboard_app::build_router(service),
        }
    }

    pub fn test_router(&self) -> Router {
        self.router.clone()
    }

    /// Register a user directly in the store
    pub fn create_user(&self, role: UserRole) -> Uuid {
        let id = Uuid::new_v4();
        let user = User::new(
            Some(format!("Test User {}", &id.to_string()[0..8])),
            Some(format!("test_{}@taskboard.test", id.simple())),
            role,
        )
        .unwrap();
        let user_id = user.id();
        self.store.insert_user(user).unwrap();
        user_id
    }

    /// Send a request and return the status with the parsed JSON body
    /// (`Value::Null` for empty bodies)
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let resp = self
            .test_router()
            .oneshot(request(method, uri, body))
            .await
            .unwrap();
        let status = resp.status();
        (status, parse_body(resp).await)
    }
}

/// Helper: build a JSON request
pub fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Helper: parse response body as JSON Value
pub async fn parse_body(response: axum::http::Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&body).unwrap()
}

/// Assert the standard error envelope and return its code
pub fn error_code(body: &Value) -> &str {
    body["error"]["code"]
        .as_str()
        .expect("error response must carry a code")
}

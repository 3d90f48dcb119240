//! Projects API integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use taskboard_projects::UserRole;

use crate::common::{error_code, parse_body, request, TestApp};

mod test_project_creation {
    use super::*;

    #[tokio::test]
    async fn test_create_project_returns_201() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);

        let (status, body) = app
            .send(
                Method::POST,
                "/v1/projects",
                Some(json!({
                    "title": "Launch",
                    "description": "Website launch",
                    "user_id": owner,
                })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["title"], "Launch");
        assert_eq!(body["user_id"], owner.to_string());
        assert_eq!(body["tasks_count"], 0);
        assert_eq!(body["pending_tasks_count"], 0);
        assert!(body["updated_at"].is_null());
        assert_eq!(app.events.recorded_names(), vec!["ProjectCreated"]);
    }

    #[tokio::test]
    async fn test_create_project_unknown_user_returns_404() {
        let app = TestApp::new();

        let (status, body) = app
            .send(
                Method::POST,
                "/v1/projects",
                Some(json!({ "title": "Launch", "user_id": Uuid::new_v4() })),
            )
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), "NOT_FOUND");
        assert!(app.events.recorded_events().is_empty());
    }

    #[tokio::test]
    async fn test_create_project_empty_title_returns_400() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);

        let (status, body) = app
            .send(
                Method::POST,
                "/v1/projects",
                Some(json!({ "title": "", "user_id": owner })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
        assert_eq!(app.store.project_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_project_malformed_json_returns_400() {
        let app = TestApp::new();
        let resp = app
            .test_router()
            .oneshot(
                axum::http::Request::builder()
                    .method(Method::POST)
                    .uri("/v1/projects")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = parse_body(resp).await;
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
    }
}

mod test_project_listing {
    use super::*;

    #[tokio::test]
    async fn test_list_projects_with_counts() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);
        let (_, project) = app
            .send(
                Method::POST,
                "/v1/projects",
                Some(json!({ "title": "Launch", "user_id": owner })),
            )
            .await;
        app.send(
            Method::POST,
            "/v1/tasks",
            Some(json!({
                "project_id": project["id"],
                "title": "Design",
                "due_date": chrono::Utc::now() + chrono::Duration::days(2),
                "priority": "high",
                "user_id": owner,
            })),
        )
        .await;

        let (status, body) = app
            .send(Method::GET, &format!("/v1/projects/user/{}", owner), None)
            .await;

        assert_eq!(status, StatusCode::OK);
        let projects = body.as_array().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0]["tasks_count"], 1);
        assert_eq!(projects[0]["pending_tasks_count"], 1);
    }

    #[tokio::test]
    async fn test_list_projects_unknown_user_returns_404() {
        let app = TestApp::new();
        let (status, _) = app
            .send(
                Method::GET,
                &format!("/v1/projects/user/{}", Uuid::new_v4()),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let resp = app
        .test_router()
        .oneshot(request(Method::GET, "/health", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

//! Reports API integration tests

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use taskboard_projects::UserRole;

use crate::common::{error_code, TestApp};

/// Helper: give `owner` a project with one completed task
async fn seed_tasks(app: &TestApp, owner: Uuid) {
    let (_, project) = app
        .send(
            Method::POST,
            "/v1/projects",
            Some(json!({ "title": "Launch", "user_id": owner })),
        )
        .await;
    let (_, task) = app
        .send(
            Method::POST,
            "/v1/tasks",
            Some(json!({
                "project_id": project["id"],
                "title": "Design",
                "due_date": Utc::now() + Duration::days(1),
                "priority": "low",
                "user_id": owner,
            })),
        )
        .await;
    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/v1/tasks/{}/status", task["id"].as_str().unwrap()),
            Some(json!({ "status": "completed", "user_id": owner })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_manager_gets_performance_report() {
    let app = TestApp::new();
    let owner = app.create_user(UserRole::Member);
    let manager = app.create_user(UserRole::Manager);
    seed_tasks(&app, owner).await;

    let (status, body) = app
        .send(
            Method::GET,
            &format!(
                "/v1/reports/performance/{}?requesting_user_id={}&days=10",
                owner, manager
            ),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], owner.to_string());
    assert_eq!(body["completed_tasks"], 1);
    assert_eq!(body["average_tasks_per_day"], 0.1);
    assert_eq!(body["overdue_tasks"], 0);
    assert!(body["report_generated_at"].is_string());
}

#[tokio::test]
async fn test_report_days_default_to_30() {
    let app = TestApp::new();
    let owner = app.create_user(UserRole::Member);
    let manager = app.create_user(UserRole::Manager);

    let (status, body) = app
        .send(
            Method::GET,
            &format!(
                "/v1/reports/performance/{}?requesting_user_id={}",
                owner, manager
            ),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed_tasks"], 0);
    assert_eq!(body["average_tasks_per_day"], 0.0);
}

#[tokio::test]
async fn test_member_gets_403() {
    let app = TestApp::new();
    let owner = app.create_user(UserRole::Member);
    let member = app.create_user(UserRole::Member);

    let (status, body) = app
        .send(
            Method::GET,
            &format!(
                "/v1/reports/performance/{}?requesting_user_id={}",
                owner, member
            ),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "AUTHORIZATION_ERROR");
}

#[tokio::test]
async fn test_out_of_range_days_returns_400() {
    let app = TestApp::new();
    let owner = app.create_user(UserRole::Member);
    let manager = app.create_user(UserRole::Manager);

    let (status, body) = app
        .send(
            Method::GET,
            &format!(
                "/v1/reports/performance/{}?requesting_user_id={}&days=0",
                owner, manager
            ),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_target_user_returns_404() {
    let app = TestApp::new();
    let manager = app.create_user(UserRole::Manager);

    let (status, _) = app
        .send(
            Method::GET,
            &format!(
                "/v1/reports/performance/{}?requesting_user_id={}",
                Uuid::new_v4(),
                manager
            ),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_completion_average_across_users() {
    let app = TestApp::new();
    let manager = app.create_user(UserRole::Manager);
    for _ in 0..2 {
        let owner = app.create_user(UserRole::Member);
        seed_tasks(&app, owner).await;
    }

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/v1/reports/average?requesting_user_id={}&days=4", manager),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["days"], 4);
    assert_eq!(body["completed_tasks"], 2);
    assert_eq!(body["average_tasks_per_day"], 0.5);
}

#[tokio::test]
async fn test_missing_requesting_user_returns_400_envelope() {
    let app = TestApp::new();
    let owner = app.create_user(UserRole::Member);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/v1/reports/performance/{}", owner),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

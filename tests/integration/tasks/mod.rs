//! Tasks API integration tests

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use taskboard_projects::UserRole;

use crate::common::{error_code, TestApp};

/// Helper: create a project owned by `owner` and return its id
async fn create_project(app: &TestApp, owner: Uuid) -> String {
    let (status, body) = app
        .send(
            Method::POST,
            "/v1/projects",
            Some(json!({ "title": "Launch", "description": "", "user_id": owner })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

/// Helper: add a task due in `days` days
async fn create_task(
    app: &TestApp,
    project_id: &str,
    owner: Uuid,
    title: &str,
    days: i64,
) -> (StatusCode, Value) {
    app.send(
        Method::POST,
        "/v1/tasks",
        Some(json!({
            "project_id": project_id,
            "title": title,
            "description": "details",
            "due_date": Utc::now() + Duration::days(days),
            "priority": "medium",
            "user_id": owner,
        })),
    )
    .await
}

mod test_task_creation {
    use super::*;

    #[tokio::test]
    async fn test_create_task_returns_201_pending() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);
        let project_id = create_project(&app, owner).await;
        app.events.reset();

        let (status, body) = create_task(&app, &project_id, owner, "Design", 3).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "pending");
        assert_eq!(body["priority"], "medium");
        assert_eq!(body["project_id"], project_id.as_str());
        assert_eq!(body["is_overdue"], false);
        assert_eq!(body["history"][0]["description"], "Task created");
        assert_eq!(app.events.recorded_names(), vec!["TaskCreated"]);
    }

    #[tokio::test]
    async fn test_create_task_past_due_date_returns_400() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);
        let project_id = create_project(&app, owner).await;

        let (status, body) = create_task(&app, &project_id, owner, "Design", -1).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_task_by_non_owner_returns_403() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);
        let other = app.create_user(UserRole::Member);
        let project_id = create_project(&app, owner).await;

        let (status, body) = create_task(&app, &project_id, other, "Design", 3).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "AUTHORIZATION_ERROR");
        assert_eq!(
            body["error"]["message"],
            "Authorization error: User can only add tasks to their own projects"
        );
    }

    #[tokio::test]
    async fn test_create_task_unknown_project_returns_404() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);

        let (status, _) = create_task(&app, &Uuid::new_v4().to_string(), owner, "Design", 3).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_twenty_first_task_returns_400_capacity() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);
        let project_id = create_project(&app, owner).await;
        for i in 0..20 {
            let (status, _) = create_task(&app, &project_id, owner, &format!("T{}", i), 3).await;
            assert_eq!(status, StatusCode::CREATED);
        }
        app.events.reset();

        let (status, body) = create_task(&app, &project_id, owner, "T21", 3).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "CAPACITY_EXCEEDED");
        assert!(app.events.recorded_events().is_empty());
    }
}

mod test_task_queries {
    use super::*;

    #[tokio::test]
    async fn test_list_tasks_ordered_by_due_date() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);
        let project_id = create_project(&app, owner).await;
        create_task(&app, &project_id, owner, "Later", 9).await;
        create_task(&app, &project_id, owner, "Sooner", 1).await;

        let (status, body) = app
            .send(
                Method::GET,
                &format!("/v1/tasks/project/{}?user_id={}", project_id, owner),
                None,
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        let titles: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Sooner", "Later"]);
    }

    #[tokio::test]
    async fn test_list_tasks_by_non_owner_returns_403() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);
        let other = app.create_user(UserRole::Member);
        let project_id = create_project(&app, owner).await;

        let (status, _) = app
            .send(
                Method::GET,
                &format!("/v1/tasks/project/{}?user_id={}", project_id, other),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_list_tasks_missing_user_query_returns_400_envelope() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);
        let project_id = create_project(&app, owner).await;

        let (status, body) = app
            .send(Method::GET, &format!("/v1/tasks/project/{}", project_id), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");

        let (status, body) = app
            .send(
                Method::GET,
                &format!("/v1/tasks/project/{}?user_id=not-a-uuid", project_id),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
    }
}

mod test_task_updates {
    use super::*;

    #[tokio::test]
    async fn test_put_updates_details_and_status() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);
        let project_id = create_project(&app, owner).await;
        let (_, task) = create_task(&app, &project_id, owner, "Design", 3).await;
        app.events.reset();

        let (status, body) = app
            .send(
                Method::PUT,
                &format!("/v1/tasks/{}", task["id"].as_str().unwrap()),
                Some(json!({
                    "title": "Design v2",
                    "description": "details",
                    "due_date": task["due_date"],
                    "status": "in_progress",
                    "user_id": owner,
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Design v2");
        assert_eq!(body["status"], "in_progress");
        assert_eq!(body["history"][1]["description"], "Title changed to 'Design v2'");
        assert_eq!(
            body["history"][2]["description"],
            "Status changed from Pending to InProgress"
        );
        assert!(!body["updated_at"].is_null());
        assert_eq!(
            app.events.recorded_names(),
            vec!["TaskUpdated", "TaskStatusChanged"]
        );
    }

    #[tokio::test]
    async fn test_put_echoing_task_back_records_nothing() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);
        let project_id = create_project(&app, owner).await;
        let (_, task) = create_task(&app, &project_id, owner, "Design", 3).await;
        app.events.reset();

        let (status, body) = app
            .send(
                Method::PUT,
                &format!("/v1/tasks/{}", task["id"].as_str().unwrap()),
                Some(json!({
                    "title": task["title"],
                    "description": task["description"],
                    "due_date": task["due_date"],
                    "user_id": owner,
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["due_date"], task["due_date"]);
        assert_eq!(body["history"].as_array().unwrap().len(), 1);
        assert!(app.events.recorded_events().is_empty());
    }

    #[tokio::test]
    async fn test_patch_status_same_value_is_noop() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);
        let project_id = create_project(&app, owner).await;
        let (_, task) = create_task(&app, &project_id, owner, "Design", 3).await;
        app.events.reset();

        let (status, body) = app
            .send(
                Method::PATCH,
                &format!("/v1/tasks/{}/status", task["id"].as_str().unwrap()),
                Some(json!({ "status": "pending", "user_id": owner })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["history"].as_array().unwrap().len(), 1);
        assert!(body["updated_at"].is_null());
        assert!(app.events.recorded_events().is_empty());
    }

    #[tokio::test]
    async fn test_patch_status_unknown_value_returns_400() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);
        let project_id = create_project(&app, owner).await;
        let (_, task) = create_task(&app, &project_id, owner, "Design", 3).await;

        let (status, _) = app
            .send(
                Method::PATCH,
                &format!("/v1/tasks/{}/status", task["id"].as_str().unwrap()),
                Some(json!({ "status": "archived", "user_id": owner })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_patch_status_by_stranger_returns_403() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);
        let other = app.create_user(UserRole::Member);
        let project_id = create_project(&app, owner).await;
        let (_, task) = create_task(&app, &project_id, owner, "Design", 3).await;

        let (status, _) = app
            .send(
                Method::PATCH,
                &format!("/v1/tasks/{}/status", task["id"].as_str().unwrap()),
                Some(json!({ "status": "completed", "user_id": other })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_comment_returns_201() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);
        let project_id = create_project(&app, owner).await;
        let (_, task) = create_task(&app, &project_id, owner, "Design", 3).await;
        let task_id = task["id"].as_str().unwrap();

        let (status, body) = app
            .send(
                Method::POST,
                &format!("/v1/tasks/{}/comments", task_id),
                Some(json!({ "content": "Looks good", "user_id": owner })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["content"], "Looks good");

        let (_, tasks) = app
            .send(
                Method::GET,
                &format!("/v1/tasks/project/{}?user_id={}", project_id, owner),
                None,
            )
            .await;
        assert_eq!(tasks[0]["comments"].as_array().unwrap().len(), 1);
        assert_eq!(
            tasks[0]["history"][1]["description"],
            "Comment added: Looks good"
        );
    }

    #[tokio::test]
    async fn test_empty_comment_returns_400() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);
        let project_id = create_project(&app, owner).await;
        let (_, task) = create_task(&app, &project_id, owner, "Design", 3).await;

        let (status, _) = app
            .send(
                Method::POST,
                &format!("/v1/tasks/{}/comments", task["id"].as_str().unwrap()),
                Some(json!({ "content": "", "user_id": owner })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

mod test_task_removal {
    use super::*;

    #[tokio::test]
    async fn test_delete_task_returns_204_then_404() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);
        let project_id = create_project(&app, owner).await;
        let (_, task) = create_task(&app, &project_id, owner, "Design", 3).await;
        let uri = format!("/v1/tasks/{}?user_id={}", task["id"].as_str().unwrap(), owner);
        app.events.reset();

        let (status, body) = app.send(Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());
        assert_eq!(app.events.recorded_names(), vec!["TaskRemoved"]);

        let (status, _) = app.send(Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_task_by_non_owner_returns_403() {
        let app = TestApp::new();
        let owner = app.create_user(UserRole::Member);
        let other = app.create_user(UserRole::Member);
        let project_id = create_project(&app, owner).await;
        let (_, task) = create_task(&app, &project_id, owner, "Design", 3).await;

        let (status, _) = app
            .send(
                Method::DELETE,
                &format!("/v1/tasks/{}?user_id={}", task["id"].as_str().unwrap(), other),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}

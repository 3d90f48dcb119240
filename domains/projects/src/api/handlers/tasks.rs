//! Task API handlers
//!
//! Tasks are addressed directly by id; every mutation is routed through the
//! owning project by [`ProjectService`](crate::service::ProjectService).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use taskboard_common::{Result, ValidatedJson, ValidatedQuery};

use crate::api::middleware::ProjectsState;
use crate::domain::entity::Entity;
use crate::domain::task::{Task, TaskComment, TaskHistory};
use crate::domain::values::{TaskPriority, TaskStatus};
use crate::service::{CreateTask, UpdateTask};

fn validate_future_date(date: &DateTime<Utc>) -> std::result::Result<(), ValidationError> {
    if *date <= Utc::now() {
        return Err(ValidationError::new("due_date_in_past")
            .with_message("Due date must be in the future".into()));
    }
    Ok(())
}

/// Request for adding a task to a project
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    pub project_id: Uuid,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,

    #[validate(custom(function = "validate_future_date"))]
    pub due_date: DateTime<Utc>,

    pub priority: TaskPriority,

    pub user_id: Uuid,
}

/// Request for replacing a task's details
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,

    pub due_date: DateTime<Utc>,

    /// Optional status change applied after the details
    pub status: Option<TaskStatus>,

    pub user_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskStatusRequest {
    pub status: TaskStatus,
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentRequest {
    #[validate(length(min = 1, max = 1000))]
    pub content: String,

    pub user_id: Uuid,
}

/// Acting user passed on the query string
#[derive(Debug, Deserialize, Validate)]
pub struct UserQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub content: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&TaskComment> for CommentResponse {
    fn from(comment: &TaskComment) -> Self {
        Self {
            id: comment.id(),
            content: comment.content().to_string(),
            user_id: comment.user_id(),
            created_at: comment.created_at(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub id: Uuid,
    pub description: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&TaskHistory> for HistoryResponse {
    fn from(entry: &TaskHistory) -> Self {
        Self {
            id: entry.id(),
            description: entry.description().to_string(),
            user_id: entry.user_id(),
            created_at: entry.created_at(),
        }
    }
}

/// Task with its comments and history
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub is_overdue: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub comments: Vec<CommentResponse>,
    pub history: Vec<HistoryResponse>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_string(),
            description: task.description().to_string(),
            due_date: task.due_date(),
            priority: task.priority(),
            status: task.status(),
            project_id: task.project_id(),
            user_id: task.user_id(),
            is_overdue: task.is_overdue(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
            comments: task.comments().iter().map(CommentResponse::from).collect(),
            history: task.history().iter().map(HistoryResponse::from).collect(),
        }
    }
}

/// List the tasks of a project, earliest due date first
///
/// **GET /v1/tasks/project/{project_id}?user_id=**
pub async fn list_tasks(
    State(state): State<ProjectsState>,
    Path(project_id): Path<Uuid>,
    ValidatedQuery(query): ValidatedQuery<UserQuery>,
) -> Result<Json<Vec<TaskResponse>>> {
    let tasks = state
        .service
        .tasks_by_project(project_id, query.user_id)
        .await?;
    Ok(Json(tasks.iter().map(TaskResponse::from).collect()))
}

/// Add a task to a project
///
/// **POST /v1/tasks**
///
/// Only the project owner may add tasks; a project holds at most 20.
pub async fn create_task(
    State(state): State<ProjectsState>,
    ValidatedJson(request): ValidatedJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>)> {
    let task = state
        .service
        .add_task(CreateTask {
            project_id: request.project_id,
            title: request.title,
            description: request.description,
            due_date: request.due_date,
            priority: request.priority,
            user_id: request.user_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(&task))))
}

/// Replace title, description and due date, with an optional status change
///
/// **PUT /v1/tasks/{task_id}**
pub async fn update_task(
    State(state): State<ProjectsState>,
    Path(task_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>> {
    let task = state
        .service
        .update_task(UpdateTask {
            task_id,
            title: request.title,
            description: request.description,
            due_date: request.due_date,
            status: request.status,
            user_id: request.user_id,
        })
        .await?;

    Ok(Json(TaskResponse::from(&task)))
}

/// **PATCH /v1/tasks/{task_id}/status**
pub async fn update_task_status(
    State(state): State<ProjectsState>,
    Path(task_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateTaskStatusRequest>,
) -> Result<Json<TaskResponse>> {
    let task = state
        .service
        .update_task_status(task_id, request.status, request.user_id)
        .await?;

    Ok(Json(TaskResponse::from(&task)))
}

/// Remove a task from its project
///
/// **DELETE /v1/tasks/{task_id}?user_id=**
pub async fn delete_task(
    State(state): State<ProjectsState>,
    Path(task_id): Path<Uuid>,
    ValidatedQuery(query): ValidatedQuery<UserQuery>,
) -> Result<StatusCode> {
    state.service.remove_task(task_id, query.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// **POST /v1/tasks/{task_id}/comments**
pub async fn add_comment(
    State(state): State<ProjectsState>,
    Path(task_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<AddCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>)> {
    let comment = state
        .service
        .add_comment(task_id, &request.content, request.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(&comment))))
}

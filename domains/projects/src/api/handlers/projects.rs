//! Project API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use taskboard_common::{Result, ValidatedJson};

use crate::api::middleware::ProjectsState;
use crate::domain::entity::Entity;
use crate::domain::project::Project;
use crate::service::CreateProject;

/// Request for creating a new project
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project title (1-200 chars)
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,

    /// Owner of the new project
    pub user_id: Uuid,
}

/// Project summary for API responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub user_id: Uuid,
    pub tasks_count: usize,
    pub pending_tasks_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Project> for ProjectResponse {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id(),
            title: project.title().to_string(),
            description: project.description().to_string(),
            user_id: project.owner_id(),
            tasks_count: project.tasks().len(),
            pending_tasks_count: project.pending_task_count(),
            created_at: project.created_at(),
            updated_at: project.updated_at(),
        }
    }
}

/// List projects owned by a user
///
/// **GET /v1/projects/user/{user_id}**
pub async fn list_projects(
    State(state): State<ProjectsState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ProjectResponse>>> {
    let projects = state.service.projects_by_user(user_id).await?;
    Ok(Json(projects.iter().map(ProjectResponse::from).collect()))
}

/// Create a new project
///
/// **POST /v1/projects**
pub async fn create_project(
    State(state): State<ProjectsState>,
    ValidatedJson(request): ValidatedJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>)> {
    let project = state
        .service
        .create_project(CreateProject {
            title: request.title,
            description: request.description,
            user_id: request.user_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ProjectResponse::from(&project))))
}

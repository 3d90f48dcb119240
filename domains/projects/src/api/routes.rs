//! Route definitions for Projects domain API

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use super::handlers::{projects, reports, tasks};
use super::middleware::ProjectsState;

/// Create project routes
fn project_routes() -> Router<ProjectsState> {
    Router::new()
        .route("/v1/projects", post(projects::create_project))
        .route("/v1/projects/user/{user_id}", get(projects::list_projects))
}

/// Create task routes
fn task_routes() -> Router<ProjectsState> {
    Router::new()
        .route("/v1/tasks", post(tasks::create_task))
        .route("/v1/tasks/project/{project_id}", get(tasks::list_tasks))
        .route(
            "/v1/tasks/{task_id}",
            put(tasks::update_task).delete(tasks::delete_task),
        )
        .route("/v1/tasks/{task_id}/status", patch(tasks::update_task_status))
        .route("/v1/tasks/{task_id}/comments", post(tasks::add_comment))
}

/// Create report routes
fn report_routes() -> Router<ProjectsState> {
    Router::new()
        .route(
            "/v1/reports/performance/{user_id}",
            get(reports::get_performance_report),
        )
        .route("/v1/reports/average", get(reports::get_completion_average))
}

/// Create all Projects domain API routes
pub fn routes() -> Router<ProjectsState> {
    Router::new()
        .merge(project_routes())
        .merge(task_routes())
        .merge(report_routes())
}

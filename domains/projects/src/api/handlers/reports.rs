//! Report API handlers (managers only)

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use taskboard_common::{Result, ValidatedQuery};

use crate::api::middleware::ProjectsState;
use crate::domain::report::{CompletionAverage, PerformanceReport, DEFAULT_REPORT_DAYS};

fn default_days() -> i64 {
    DEFAULT_REPORT_DAYS
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReportQuery {
    /// Manager asking for the report
    pub requesting_user_id: Uuid,

    /// Trailing window in days (1-365, default 30)
    #[serde(default = "default_days")]
    #[validate(range(min = 1, max = 365))]
    pub days: i64,
}

/// Performance report for one user
///
/// **GET /v1/reports/performance/{user_id}?requesting_user_id=&days=30**
pub async fn get_performance_report(
    State(state): State<ProjectsState>,
    Path(user_id): Path<Uuid>,
    ValidatedQuery(query): ValidatedQuery<ReportQuery>,
) -> Result<Json<PerformanceReport>> {
    let report = state
        .service
        .performance_report(user_id, query.requesting_user_id, query.days)
        .await?;

    Ok(Json(report))
}

/// Completed tasks per day across all users
///
/// **GET /v1/reports/average?requesting_user_id=&days=30**
pub async fn get_completion_average(
    State(state): State<ProjectsState>,
    ValidatedQuery(query): ValidatedQuery<ReportQuery>,
) -> Result<Json<CompletionAverage>> {
    let average = state
        .service
        .average_completed_per_day(query.requesting_user_id, query.days)
        .await?;

    Ok(Json(average))
}

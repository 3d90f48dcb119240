//! Performance reports over a trailing window of days

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskboard_common::{Error, Result};

pub const DEFAULT_REPORT_DAYS: i64 = 30;
pub const MAX_REPORT_DAYS: i64 = 365;

/// Trailing time window `[from, to]` ending now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub days: i64,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl ReportWindow {
    pub fn ending_at(to: DateTime<Utc>, days: i64) -> Result<Self> {
        if !(1..=MAX_REPORT_DAYS).contains(&days) {
            return Err(Error::Validation(format!(
                "Days must be between 1 and {}",
                MAX_REPORT_DAYS
            )));
        }

        Ok(Self {
            days,
            from: to - Duration::days(days),
            to,
        })
    }

    pub fn ending_now(days: i64) -> Result<Self> {
        Self::ending_at(Utc::now(), days)
    }

    /// Average of `count` spread over the window's days
    pub fn per_day(&self, count: i64) -> f64 {
        count as f64 / self.days as f64
    }
}

/// Completed and overdue task counts for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub user_id: Uuid,
    pub completed_tasks: i64,
    pub average_tasks_per_day: f64,
    pub overdue_tasks: i64,
    pub report_generated_at: DateTime<Utc>,
}

impl PerformanceReport {
    pub fn compute(
        user_id: Uuid,
        window: &ReportWindow,
        completed_tasks: i64,
        overdue_tasks: i64,
    ) -> Self {
        Self {
            user_id,
            completed_tasks,
            average_tasks_per_day: window.per_day(completed_tasks),
            overdue_tasks,
            report_generated_at: Utc::now(),
        }
    }
}

/// Completions per day across every user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionAverage {
    pub days: i64,
    pub completed_tasks: i64,
    pub average_tasks_per_day: f64,
}

impl CompletionAverage {
    pub fn compute(window: &ReportWindow, completed_tasks: i64) -> Self {
        Self {
            days: window.days,
            completed_tasks,
            average_tasks_per_day: window.per_day(completed_tasks),
        }
    }
}

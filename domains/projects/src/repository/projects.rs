//! Postgres project store

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use taskboard_common::Result;

use crate::domain::entity::Entity;
use crate::domain::project::{Project, ProjectParts};
use crate::domain::task::{Task, TaskComment, TaskHistory, TaskParts};
use crate::domain::values::{TaskPriority, TaskStatus};
use crate::repository::transactions::{
    delete_missing_tasks_tx, insert_comment_tx, insert_history_tx, lock_project_tx,
    upsert_project_tx, upsert_task_tx,
};
use crate::repository::ProjectStore;

const PROJECT_COLUMNS: &str = "id, title, description, owner_id, created_at, updated_at";

const TASK_COLUMNS: &str = "id, project_id, title, description, due_date, priority, status, \
                            user_id, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    title: String,
    description: String,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: Uuid,
    project_id: Uuid,
    title: String,
    description: String,
    due_date: DateTime<Utc>,
    priority: TaskPriority,
    status: TaskStatus,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    task_id: Uuid,
    content: String,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    id: Uuid,
    task_id: Uuid,
    description: String,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

impl TaskRow {
    fn into_task(self, comments: Vec<TaskComment>, history: Vec<TaskHistory>) -> Task {
        Task::from_parts(TaskParts {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            priority: self.priority,
            status: self.status,
            project_id: self.project_id,
            user_id: self.user_id,
            comments,
            history,
        })
    }
}

impl ProjectRow {
    fn into_project(self, tasks: Vec<Task>) -> Project {
        Project::from_parts(ProjectParts {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            title: self.title,
            description: self.description,
            owner_id: self.owner_id,
            tasks,
        })
    }
}

#[derive(Clone)]
pub struct PgProjectStore {
    pool: PgPool,
}

impl PgProjectStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load tasks, comments and history for the given project rows and
    /// assemble them into aggregates, keeping the row order.
    async fn hydrate(&self, rows: Vec<ProjectRow>) -> Result<Vec<Project>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let project_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let task_rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = ANY($1) ORDER BY project_id, position"
        ))
        .bind(&project_ids)
        .fetch_all(&self.pool)
        .await?;

        let task_ids: Vec<Uuid> = task_rows.iter().map(|t| t.id).collect();

        let comment_rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, task_id, content, user_id, created_at
            FROM task_comments
            WHERE task_id = ANY($1)
            ORDER BY task_id, position
            "#,
        )
        .bind(&task_ids)
        .fetch_all(&self.pool)
        .await?;

        let history_rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT id, task_id, description, user_id, created_at
            FROM task_history
            WHERE task_id = ANY($1)
            ORDER BY task_id, position
            "#,
        )
        .bind(&task_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut comments: HashMap<Uuid, Vec<TaskComment>> = HashMap::new();
        for row in comment_rows {
            comments.entry(row.task_id).or_default().push(TaskComment::restore(
                row.id,
                row.content,
                row.user_id,
                row.created_at,
            ));
        }

        let mut history: HashMap<Uuid, Vec<TaskHistory>> = HashMap::new();
        for row in history_rows {
            history.entry(row.task_id).or_default().push(TaskHistory::restore(
                row.id,
                row.description,
                row.user_id,
                row.created_at,
            ));
        }

        let mut tasks: HashMap<Uuid, Vec<Task>> = HashMap::new();
        for row in task_rows {
            let task_comments = comments.remove(&row.id).unwrap_or_default();
            let task_history = history.remove(&row.id).unwrap_or_default();
            tasks
                .entry(row.project_id)
                .or_default()
                .push(row.into_task(task_comments, task_history));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let project_tasks = tasks.remove(&row.id).unwrap_or_default();
                row.into_project(project_tasks)
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl ProjectStore for PgProjectStore {
    async fn find(&self, project_id: Uuid) -> Result<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_task(&self, task_id: Uuid) -> Result<Option<Project>> {
        let project_id =
            sqlx::query_scalar::<_, Uuid>("SELECT project_id FROM tasks WHERE id = $1")
                .bind(task_id)
                .fetch_optional(&self.pool)
                .await?;

        match project_id {
            Some(project_id) => self.find(project_id).await,
            None => Ok(None),
        }
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(rows).await
    }

    async fn save(&self, project: &Project) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        lock_project_tx(&mut tx, project.id()).await?;
        upsert_project_tx(&mut tx, project).await?;

        let kept: Vec<Uuid> = project.tasks().iter().map(|t| t.id()).collect();
        let removed = delete_missing_tasks_tx(&mut tx, project.id(), &kept).await?;

        for (position, task) in project.tasks().iter().enumerate() {
            upsert_task_tx(&mut tx, task, position as i32).await?;
            for (i, comment) in task.comments().iter().enumerate() {
                insert_comment_tx(&mut tx, task.id(), comment, i as i32).await?;
            }
            for (i, entry) in task.history().iter().enumerate() {
                insert_history_tx(&mut tx, task.id(), entry, i as i32).await?;
            }
        }

        tx.commit().await?;

        tracing::debug!(
            project_id = %project.id(),
            tasks = project.tasks().len(),
            removed_tasks = removed,
            "Saved project aggregate"
        );
        Ok(())
    }

    async fn count_completed_by_user(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM tasks
            WHERE user_id = $1 AND status = $2 AND updated_at >= $3 AND updated_at <= $4
            "#,
        )
        .bind(user_id)
        .bind(TaskStatus::Completed)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn count_completed(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tasks WHERE status = $1 AND updated_at >= $2 AND updated_at <= $3",
        )
        .bind(TaskStatus::Completed)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn count_overdue_by_user(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tasks WHERE user_id = $1 AND due_date < $2 AND status <> $3",
        )
        .bind(user_id)
        .bind(now)
        .bind(TaskStatus::Completed)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

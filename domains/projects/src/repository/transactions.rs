//! Transactional free functions for Projects domain
//!
//! Used by [`PgProjectStore::save`](super::PgProjectStore) to rewrite one
//! aggregate inside a single transaction.

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entity::Entity;
use crate::domain::project::Project;
use crate::domain::task::{Task, TaskComment, TaskHistory};

/// Insert or update the project row. The row stays locked until commit.
pub async fn upsert_project_tx(
    tx: &mut Transaction<'_, Postgres>,
    project: &Project,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO projects (id, title, description, owner_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO UPDATE SET
            title = EXCLUDED.title,
            description = EXCLUDED.description,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(project.id())
    .bind(project.title())
    .bind(project.description())
    .bind(project.owner_id())
    .bind(project.created_at())
    .bind(project.updated_at())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Lock the project row so concurrent saves of the same aggregate serialize
pub async fn lock_project_tx(
    tx: &mut Transaction<'_, Postgres>,
    project_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
        .bind(project_id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(())
}

/// Delete tasks of the project that are no longer part of the aggregate.
/// Comments and history go with them through `ON DELETE CASCADE`.
pub async fn delete_missing_tasks_tx(
    tx: &mut Transaction<'_, Postgres>,
    project_id: Uuid,
    kept_task_ids: &[Uuid],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tasks WHERE project_id = $1 AND NOT (id = ANY($2))")
        .bind(project_id)
        .bind(kept_task_ids)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected())
}

/// Insert or update one task row at `position` within its project
pub async fn upsert_task_tx(
    tx: &mut Transaction<'_, Postgres>,
    task: &Task,
    position: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO tasks (id, project_id, position, title, description, due_date,
                           priority, status, user_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (id) DO UPDATE SET
            position = EXCLUDED.position,
            title = EXCLUDED.title,
            description = EXCLUDED.description,
            due_date = EXCLUDED.due_date,
            priority = EXCLUDED.priority,
            status = EXCLUDED.status,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(task.id())
    .bind(task.project_id())
    .bind(position)
    .bind(task.title())
    .bind(task.description())
    .bind(task.due_date())
    .bind(task.priority())
    .bind(task.status())
    .bind(task.user_id())
    .bind(task.created_at())
    .bind(task.updated_at())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Comments are immutable: existing rows are left as they are
pub async fn insert_comment_tx(
    tx: &mut Transaction<'_, Postgres>,
    task_id: Uuid,
    comment: &TaskComment,
    position: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO task_comments (id, task_id, position, content, user_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(comment.id())
    .bind(task_id)
    .bind(position)
    .bind(comment.content())
    .bind(comment.user_id())
    .bind(comment.created_at())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// History is append-only: existing rows are left as they are
pub async fn insert_history_tx(
    tx: &mut Transaction<'_, Postgres>,
    task_id: Uuid,
    entry: &TaskHistory,
    position: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO task_history (id, task_id, position, description, user_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(entry.id())
    .bind(task_id)
    .bind(position)
    .bind(entry.description())
    .bind(entry.user_id())
    .bind(entry.created_at())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

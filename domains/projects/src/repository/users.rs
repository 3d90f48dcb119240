//! Postgres user directory

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use taskboard_common::Result;

use crate::domain::user::User;
use crate::domain::values::UserRole;
use crate::repository::UserDirectory;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    role: UserRole,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find(&self, user_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| User::restore(r.id, r.name, r.email, r.role, r.created_at, r.updated_at)))
    }

    async fn exists(&self, user_id: Uuid) -> Result<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn is_manager(&self, user_id: Uuid) -> Result<bool> {
        let is_manager = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND role = 'manager')",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(is_manager)
    }
}

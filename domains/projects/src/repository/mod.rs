//! Repository implementations for Projects domain
//!
//! Stores load and save whole aggregates. Postgres backs production; the
//! in-memory store backs tests and database-less local runs.

pub mod memory;
pub mod projects;
pub mod transactions;
pub mod users;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use taskboard_common::Result;

use crate::domain::project::Project;
use crate::domain::user::User;

pub use memory::InMemoryStore;
pub use projects::PgProjectStore;
pub use users::PgUserDirectory;

/// Load and save project aggregates
#[async_trait::async_trait]
pub trait ProjectStore: Send + Sync {
    /// Load a project with all of its tasks, comments and history
    async fn find(&self, project_id: Uuid) -> Result<Option<Project>>;

    /// Load the project owning `task_id`
    async fn find_by_task(&self, task_id: Uuid) -> Result<Option<Project>>;

    /// Projects owned by a user, newest first
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Project>>;

    /// Persist the aggregate, including removals of tasks no longer present
    async fn save(&self, project: &Project) -> Result<()>;

    /// Completed tasks of a user whose last update falls in `[from, to]`
    async fn count_completed_by_user(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64>;

    /// Completed tasks of every user whose last update falls in `[from, to]`
    async fn count_completed(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<i64>;

    /// Tasks of a user that are past due and not completed at `now`
    async fn count_overdue_by_user(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<i64>;
}

/// Read-only access to users
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find(&self, user_id: Uuid) -> Result<Option<User>>;

    async fn exists(&self, user_id: Uuid) -> Result<bool> {
        Ok(self.find(user_id).await?.is_some())
    }

    async fn is_manager(&self, user_id: Uuid) -> Result<bool> {
        Ok(self
            .find(user_id)
            .await?
            .map(|u| u.is_manager())
            .unwrap_or(false))
    }
}

/// Combined repository access for the Projects domain
#[derive(Clone)]
pub struct ProjectsRepositories {
    pub projects: Arc<dyn ProjectStore>,
    pub users: Arc<dyn UserDirectory>,
}

impl ProjectsRepositories {
    /// Postgres-backed repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            projects: Arc::new(PgProjectStore::new(pool.clone())),
            users: Arc::new(PgUserDirectory::new(pool)),
        }
    }

    /// Both traits served by one in-memory store
    pub fn in_memory(store: InMemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            projects: store.clone(),
            users: store,
        }
    }
}

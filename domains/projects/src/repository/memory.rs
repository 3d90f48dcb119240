//! In-memory project store and user directory

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use taskboard_common::{RepositoryError, Result};

use crate::domain::entity::Entity;
use crate::domain::project::Project;
use crate::domain::task::Task;
use crate::domain::user::User;
use crate::domain::values::TaskStatus;
use crate::repository::{ProjectStore, UserDirectory};

#[derive(Debug, Default)]
struct Tables {
    projects: HashMap<Uuid, Project>,
    users: HashMap<Uuid, User>,
}

/// Thread-safe store keeping aggregates in a map. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user so it can act on projects
    pub fn insert_user(&self, user: User) -> Result<()> {
        self.write()?.users.insert(user.id(), user);
        Ok(())
    }

    pub fn project_count(&self) -> Result<usize> {
        Ok(self.read()?.projects.len())
    }

    fn read(&self) -> std::result::Result<RwLockReadGuard<'_, Tables>, RepositoryError> {
        self.tables.read().map_err(|_| RepositoryError::Poisoned)
    }

    fn write(&self) -> std::result::Result<RwLockWriteGuard<'_, Tables>, RepositoryError> {
        self.tables.write().map_err(|_| RepositoryError::Poisoned)
    }

    fn count_tasks<F>(&self, predicate: F) -> Result<i64>
    where
        F: Fn(&Task) -> bool,
    {
        let tables = self.read()?;
        let count = tables
            .projects
            .values()
            .flat_map(|p| p.tasks())
            .filter(|t| predicate(*t))
            .count();
        Ok(count as i64)
    }
}

fn completed_within(task: &Task, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
    task.status() == TaskStatus::Completed
        && task
            .updated_at()
            .map(|at| at >= from && at <= to)
            .unwrap_or(false)
}

#[async_trait::async_trait]
impl ProjectStore for InMemoryStore {
    async fn find(&self, project_id: Uuid) -> Result<Option<Project>> {
        Ok(self.read()?.projects.get(&project_id).cloned())
    }

    async fn find_by_task(&self, task_id: Uuid) -> Result<Option<Project>> {
        Ok(self
            .read()?
            .projects
            .values()
            .find(|p| p.task(task_id).is_some())
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Project>> {
        let mut projects: Vec<Project> = self
            .read()?
            .projects
            .values()
            .filter(|p| p.is_owned_by(owner_id))
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(projects)
    }

    async fn save(&self, project: &Project) -> Result<()> {
        // Stored copies never carry buffered events
        let mut stored = project.clone();
        stored.clear_all_domain_events();

        self.write()?.projects.insert(stored.id(), stored);
        Ok(())
    }

    async fn count_completed_by_user(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64> {
        self.count_tasks(|t| t.user_id() == user_id && completed_within(t, from, to))
    }

    async fn count_completed(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<i64> {
        self.count_tasks(|t| completed_within(t, from, to))
    }

    async fn count_overdue_by_user(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<i64> {
        self.count_tasks(|t| t.user_id() == user_id && t.is_overdue_at(now))
    }
}

#[async_trait::async_trait]
impl UserDirectory for InMemoryStore {
    async fn find(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.read()?.users.get(&user_id).cloned())
    }
}

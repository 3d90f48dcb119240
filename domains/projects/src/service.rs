//! Use cases for the Projects domain
//!
//! Each command checks that the acting user exists, loads the aggregate,
//! checks ownership, runs exactly one aggregate operation, saves it and then
//! hands the drained domain events to the event sink. Nothing is published
//! when any step before the save fails.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use taskboard_common::{Error, Result};
use taskboard_events::{EventSink, OutboundEvent};

use crate::domain::entity::Entity;
use crate::domain::events::DomainEvent;
use crate::domain::project::Project;
use crate::domain::report::{CompletionAverage, PerformanceReport, ReportWindow};
use crate::domain::task::{Task, TaskComment};
use crate::domain::values::{TaskPriority, TaskStatus};
use crate::repository::ProjectsRepositories;

/// Create a project owned by `user_id`
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub user_id: Uuid,
}

/// Add a task to an existing project
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: TaskPriority,
    pub user_id: Uuid,
}

/// Replace a task's details, optionally moving it to a new status
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub task_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub status: Option<TaskStatus>,
    pub user_id: Uuid,
}

fn not_found(entity: &str, id: Uuid) -> Error {
    Error::NotFound(format!("{} with ID {} was not found", entity, id))
}

#[derive(Clone)]
pub struct ProjectService {
    repos: ProjectsRepositories,
    events: Arc<dyn EventSink>,
}

impl ProjectService {
    pub fn new(repos: ProjectsRepositories, events: Arc<dyn EventSink>) -> Self {
        Self { repos, events }
    }

    pub async fn create_project(&self, command: CreateProject) -> Result<Project> {
        self.require_user(command.user_id).await?;

        let mut project = Project::new(
            Some(command.title),
            Some(command.description),
            command.user_id,
        )?;
        self.commit(&mut project).await?;

        tracing::info!(project_id = %project.id(), owner_id = %command.user_id, "Project created");
        Ok(project)
    }

    pub async fn add_task(&self, command: CreateTask) -> Result<Task> {
        self.require_user(command.user_id).await?;

        let mut project = self.load_project(command.project_id).await?;
        if !project.is_owned_by(command.user_id) {
            return Err(Error::Authorization(
                "User can only add tasks to their own projects".to_string(),
            ));
        }

        let task_id = project
            .add_task(
                Some(command.title),
                Some(command.description),
                command.due_date,
                command.priority,
                command.user_id,
            )?
            .id();
        self.commit(&mut project).await?;

        tracing::info!(project_id = %project.id(), task_id = %task_id, "Task added");
        cloned_task(&project, task_id)
    }

    /// Update details and, when given, the status of a task.
    ///
    /// Details are applied first; a blank title rejects the whole call
    /// before the status is touched.
    pub async fn update_task(&self, command: UpdateTask) -> Result<Task> {
        self.require_user(command.user_id).await?;

        let mut project = self.load_project_of_task(command.task_id).await?;
        let task = modifiable_task(&mut project, command.task_id, command.user_id)?;

        task.update_details(
            &command.title,
            &command.description,
            command.due_date,
            command.user_id,
        )?;
        if let Some(status) = command.status {
            task.update_status(status, command.user_id);
        }
        self.commit(&mut project).await?;

        tracing::info!(task_id = %command.task_id, "Task updated");
        cloned_task(&project, command.task_id)
    }

    pub async fn update_task_status(
        &self,
        task_id: Uuid,
        status: TaskStatus,
        user_id: Uuid,
    ) -> Result<Task> {
        self.require_user(user_id).await?;

        let mut project = self.load_project_of_task(task_id).await?;
        modifiable_task(&mut project, task_id, user_id)?.update_status(status, user_id);
        self.commit(&mut project).await?;

        tracing::info!(task_id = %task_id, status = %status, "Task status updated");
        cloned_task(&project, task_id)
    }

    pub async fn add_comment(
        &self,
        task_id: Uuid,
        content: &str,
        user_id: Uuid,
    ) -> Result<TaskComment> {
        self.require_user(user_id).await?;

        let mut project = self.load_project_of_task(task_id).await?;
        let comment = modifiable_task(&mut project, task_id, user_id)?
            .add_comment(content, user_id)?
            .clone();
        self.commit(&mut project).await?;

        tracing::info!(task_id = %task_id, comment_id = %comment.id(), "Comment added");
        Ok(comment)
    }

    /// Only the project owner may remove tasks
    pub async fn remove_task(&self, task_id: Uuid, user_id: Uuid) -> Result<()> {
        self.require_user(user_id).await?;

        let mut project = self.load_project_of_task(task_id).await?;
        if !project.is_owned_by(user_id) {
            return Err(Error::Authorization(
                "User can only delete tasks from their own projects".to_string(),
            ));
        }

        project.remove_task(task_id)?;
        self.commit(&mut project).await?;

        tracing::info!(project_id = %project.id(), task_id = %task_id, "Task removed");
        Ok(())
    }

    /// Projects owned by a user, newest first
    pub async fn projects_by_user(&self, user_id: Uuid) -> Result<Vec<Project>> {
        self.require_user(user_id).await?;
        self.repos.projects.list_by_owner(user_id).await
    }

    /// Tasks of a project ordered by due date. Owner only.
    pub async fn tasks_by_project(&self, project_id: Uuid, user_id: Uuid) -> Result<Vec<Task>> {
        self.require_user(user_id).await?;

        let project = self.load_project(project_id).await?;
        if !project.is_owned_by(user_id) {
            return Err(Error::Authorization(
                "User can only view tasks from their own projects".to_string(),
            ));
        }

        let mut tasks = project.tasks().to_vec();
        tasks.sort_by_key(|t| t.due_date());
        Ok(tasks)
    }

    /// Completion statistics for `user_id` over the last `days` days.
    /// Only managers may request them.
    pub async fn performance_report(
        &self,
        user_id: Uuid,
        requesting_user_id: Uuid,
        days: i64,
    ) -> Result<PerformanceReport> {
        self.require_manager(requesting_user_id).await?;
        self.require_user(user_id).await?;

        let window = ReportWindow::ending_now(days)?;
        let completed = self
            .repos
            .projects
            .count_completed_by_user(user_id, window.from, window.to)
            .await?;
        let overdue = self
            .repos
            .projects
            .count_overdue_by_user(user_id, window.to)
            .await?;

        Ok(PerformanceReport::compute(user_id, &window, completed, overdue))
    }

    /// Completed tasks per day across all users. Only managers may request it.
    pub async fn average_completed_per_day(
        &self,
        requesting_user_id: Uuid,
        days: i64,
    ) -> Result<CompletionAverage> {
        self.require_manager(requesting_user_id).await?;

        let window = ReportWindow::ending_now(days)?;
        let completed = self
            .repos
            .projects
            .count_completed(window.from, window.to)
            .await?;

        Ok(CompletionAverage::compute(&window, completed))
    }

    async fn require_user(&self, user_id: Uuid) -> Result<()> {
        if !self.repos.users.exists(user_id).await? {
            return Err(not_found("User", user_id));
        }
        Ok(())
    }

    async fn require_manager(&self, user_id: Uuid) -> Result<()> {
        let user = self
            .repos
            .users
            .find(user_id)
            .await?
            .ok_or_else(|| not_found("User", user_id))?;

        if !user.is_manager() {
            return Err(Error::Authorization(
                "Only managers can access performance reports".to_string(),
            ));
        }
        Ok(())
    }

    async fn load_project(&self, project_id: Uuid) -> Result<Project> {
        self.repos
            .projects
            .find(project_id)
            .await?
            .ok_or_else(|| not_found("Project", project_id))
    }

    async fn load_project_of_task(&self, task_id: Uuid) -> Result<Project> {
        self.repos
            .projects
            .find_by_task(task_id)
            .await?
            .ok_or_else(|| not_found("Task", task_id))
    }

    /// Save the aggregate, then publish what it raised
    async fn commit(&self, project: &mut Project) -> Result<()> {
        self.repos.projects.save(project).await?;
        let events = project.take_all_domain_events();
        self.dispatch(events).await;
        Ok(())
    }

    /// The state change is already durable here, so delivery failures are
    /// logged rather than returned.
    async fn dispatch(&self, events: Vec<DomainEvent>) {
        if events.is_empty() {
            return;
        }

        let outbound = match events
            .iter()
            .map(DomainEvent::to_outbound)
            .collect::<Result<Vec<OutboundEvent>>>()
        {
            Ok(outbound) => outbound,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize domain events");
                return;
            }
        };

        let count = outbound.len();
        if let Err(e) = self.events.publish_all(outbound).await {
            tracing::error!(error = %e, events = count, "Failed to publish domain events");
        }
    }
}

/// Task of `project` the user may modify: the project owner or the user the
/// task was created by.
fn modifiable_task(project: &mut Project, task_id: Uuid, user_id: Uuid) -> Result<&mut Task> {
    let owner = project.is_owned_by(user_id);
    let task = project
        .task_mut(task_id)
        .ok_or_else(|| not_found("Task", task_id))?;

    if !owner && task.user_id() != user_id {
        return Err(Error::Authorization(
            "User can only modify tasks of their own projects".to_string(),
        ));
    }
    Ok(task)
}

fn cloned_task(project: &Project, task_id: Uuid) -> Result<Task> {
    project
        .task(task_id)
        .cloned()
        .ok_or_else(|| not_found("Task", task_id))
}

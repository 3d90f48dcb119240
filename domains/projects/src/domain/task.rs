//! Task: the aggregate member owned by exactly one project
//!
//! A task owns its comments and its audit history. It is only reachable
//! through its owning [`Project`](crate::domain::project::Project) and keeps
//! nothing but the project's identifier as a back-reference.

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

use taskboard_common::{Error, Result};

use crate::domain::entity::{Entity, EntityBase};
use crate::domain::events::{DomainEvent, DomainEventKind};
use crate::domain::values::{TaskPriority, TaskStatus};

/// Due dates are kept at microsecond precision, the resolution of the
/// `timestamptz` column, so a value echoed back by a client compares equal.
fn stored_due_date(due_date: DateTime<Utc>) -> DateTime<Utc> {
    due_date.trunc_subsecs(6)
}

/// Comment left on a task. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskComment {
    base: EntityBase,
    content: String,
    user_id: Uuid,
}

impl TaskComment {
    pub fn new(content: &str, user_id: Uuid) -> Result<Self> {
        if content.trim().is_empty() {
            return Err(Error::Validation(
                "Comment content cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            base: EntityBase::new(),
            content: content.to_string(),
            user_id,
        })
    }

    /// Rebuild a persisted comment
    pub fn restore(id: Uuid, content: String, user_id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            base: EntityBase::restore(id, created_at, None),
            content,
            user_id,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

impl Entity for TaskComment {
    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }
}

/// One line of a task's audit trail. Immutable, append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskHistory {
    base: EntityBase,
    description: String,
    user_id: Uuid,
}

impl TaskHistory {
    pub fn new(description: String, user_id: Uuid) -> Self {
        Self {
            base: EntityBase::new(),
            description,
            user_id,
        }
    }

    /// Rebuild a persisted history entry
    pub fn restore(
        id: Uuid,
        description: String,
        user_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            base: EntityBase::restore(id, created_at, None),
            description,
            user_id,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

impl Entity for TaskHistory {
    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }
}

/// Persisted state of a task, used to rehydrate it from storage
#[derive(Debug, Clone)]
pub struct TaskParts {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub comments: Vec<TaskComment>,
    pub history: Vec<TaskHistory>,
}

/// Task entity
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    base: EntityBase,
    title: String,
    description: String,
    due_date: DateTime<Utc>,
    priority: TaskPriority,
    status: TaskStatus,
    project_id: Uuid,
    user_id: Uuid,
    comments: Vec<TaskComment>,
    history: Vec<TaskHistory>,
}

impl Task {
    /// Create a new pending task
    ///
    /// Records a "Task created" history entry. No event is raised here; the
    /// owning project raises `TaskCreated`.
    pub fn new(
        title: Option<String>,
        description: Option<String>,
        due_date: DateTime<Utc>,
        priority: TaskPriority,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Self> {
        let title = title.ok_or_else(|| Error::Validation("Title is required".to_string()))?;
        let description =
            description.ok_or_else(|| Error::Validation("Description is required".to_string()))?;

        let mut task = Task {
            base: EntityBase::new(),
            title,
            description,
            due_date: stored_due_date(due_date),
            priority,
            status: TaskStatus::Pending,
            project_id,
            user_id,
            comments: Vec::new(),
            history: Vec::new(),
        };
        task.add_history_entry("Task created".to_string(), user_id);
        Ok(task)
    }

    /// Rebuild a persisted task. The event buffer starts empty.
    pub fn from_parts(parts: TaskParts) -> Self {
        Task {
            base: EntityBase::restore(parts.id, parts.created_at, parts.updated_at),
            title: parts.title,
            description: parts.description,
            due_date: parts.due_date,
            priority: parts.priority,
            status: parts.status,
            project_id: parts.project_id,
            user_id: parts.user_id,
            comments: parts.comments,
            history: parts.history,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    pub fn priority(&self) -> TaskPriority {
        self.priority
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    /// User allowed to modify this task
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn comments(&self) -> &[TaskComment] {
        &self.comments
    }

    pub fn history(&self) -> &[TaskHistory] {
        &self.history
    }

    /// Update title, description and due date
    ///
    /// Only fields that differ from the current values are changed. When
    /// nothing differs the call leaves the task untouched: no history entry,
    /// no event, no timestamp update.
    pub fn update_details(
        &mut self,
        title: &str,
        description: &str,
        due_date: DateTime<Utc>,
        user_id: Uuid,
    ) -> Result<()> {
        if title.trim().is_empty() {
            return Err(Error::Validation("Title cannot be empty".to_string()));
        }

        let due_date = stored_due_date(due_date);
        let mut changes = Vec::new();

        if self.title != title {
            self.title = title.to_string();
            changes.push(format!("Title changed to '{}'", title));
        }

        if self.description != description {
            self.description = description.to_string();
            changes.push("Description updated".to_string());
        }

        if self.due_date != due_date {
            self.due_date = due_date;
            changes.push(format!("Due date changed to {}", due_date.format("%Y-%m-%d")));
        }

        if changes.is_empty() {
            return Ok(());
        }

        self.base.touch();
        self.add_history_entry(changes.join(", "), user_id);
        self.base.record(DomainEvent::new(DomainEventKind::TaskUpdated {
            task_id: self.id(),
            project_id: self.project_id,
            user_id,
        }));
        Ok(())
    }

    /// Move the task to `new_status`. A no-op when the status is unchanged.
    pub fn update_status(&mut self, new_status: TaskStatus, user_id: Uuid) {
        if self.status == new_status {
            return;
        }

        let old_status = self.status;
        self.status = new_status;
        self.base.touch();

        self.add_history_entry(
            format!("Status changed from {} to {}", old_status, new_status),
            user_id,
        );
        self.base
            .record(DomainEvent::new(DomainEventKind::TaskStatusChanged {
                task_id: self.id(),
                project_id: self.project_id,
                old_status,
                new_status,
                user_id,
            }));
    }

    /// Add a comment; the content is also copied into the history
    pub fn add_comment(&mut self, content: &str, user_id: Uuid) -> Result<&TaskComment> {
        let comment = TaskComment::new(content, user_id)?;
        let index = self.comments.len();
        self.comments.push(comment);

        self.add_history_entry(format!("Comment added: {}", content), user_id);
        self.base
            .record(DomainEvent::new(DomainEventKind::TaskCommentAdded {
                task_id: self.id(),
                project_id: self.project_id,
                user_id,
                content: content.to_string(),
            }));

        Ok(&self.comments[index])
    }

    /// True iff the due date has passed and the task is not completed
    #[mutants::skip] // Delegates to is_overdue_at() with the wall clock
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }

    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now && self.status != TaskStatus::Completed
    }

    fn add_history_entry(&mut self, description: String, user_id: Uuid) {
        self.history.push(TaskHistory::new(description, user_id));
    }
}

impl Entity for Task {
    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }
}

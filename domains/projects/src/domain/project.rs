//! Project: the aggregate root
//!
//! Every mutation of a project's tasks passes through the project so that the
//! task cap and the event stream stay consistent.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use taskboard_common::{Error, Result};

use crate::domain::entity::{Entity, EntityBase};
use crate::domain::events::{DomainEvent, DomainEventKind};
use crate::domain::task::Task;
use crate::domain::values::TaskPriority;

/// Upper bound on the number of tasks a single project may own
pub const MAX_TASKS_PER_PROJECT: usize = 20;

/// Persisted state of a project, used to rehydrate it from storage
#[derive(Debug, Clone)]
pub struct ProjectParts {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub title: String,
    pub description: String,
    pub owner_id: Uuid,
    pub tasks: Vec<Task>,
}

/// Project entity
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    base: EntityBase,
    title: String,
    description: String,
    owner_id: Uuid,
    tasks: Vec<Task>,
}

impl Project {
    /// Create a new project and raise `ProjectCreated`
    pub fn new(title: Option<String>, description: Option<String>, owner_id: Uuid) -> Result<Self> {
        let title = title.ok_or_else(|| Error::Validation("Title is required".to_string()))?;
        let description =
            description.ok_or_else(|| Error::Validation("Description is required".to_string()))?;

        let mut project = Project {
            base: EntityBase::new(),
            title,
            description,
            owner_id,
            tasks: Vec::new(),
        };

        let event = DomainEvent::new(DomainEventKind::ProjectCreated {
            project_id: project.id(),
            title: project.title.clone(),
            owner_id,
        });
        project.base.record(event);

        Ok(project)
    }

    /// Rebuild a persisted project. No events are buffered.
    pub fn from_parts(parts: ProjectParts) -> Self {
        Project {
            base: EntityBase::restore(parts.id, parts.created_at, parts.updated_at),
            title: parts.title,
            description: parts.description,
            owner_id: parts.owner_id,
            tasks: parts.tasks,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Tasks in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, task_id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == task_id)
    }

    /// Mutable access to one member task
    pub fn task_mut(&mut self, task_id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id() == task_id)
    }

    /// Overwrite title and description
    ///
    /// Unlike task updates this always stamps `updated_at`, records no
    /// history and raises no event.
    pub fn update_details(&mut self, title: &str, description: &str) -> Result<()> {
        if title.trim().is_empty() {
            return Err(Error::Validation("Title cannot be empty".to_string()));
        }

        self.title = title.to_string();
        self.description = description.to_string();
        self.base.touch();
        Ok(())
    }

    /// Append a new task and raise `TaskCreated`
    pub fn add_task(
        &mut self,
        title: Option<String>,
        description: Option<String>,
        due_date: DateTime<Utc>,
        priority: TaskPriority,
        user_id: Uuid,
    ) -> Result<&Task> {
        if self.tasks.len() >= MAX_TASKS_PER_PROJECT {
            return Err(Error::CapacityExceeded(format!(
                "Project cannot have more than {} tasks",
                MAX_TASKS_PER_PROJECT
            )));
        }

        let task = Task::new(title, description, due_date, priority, self.id(), user_id)?;
        let event = DomainEvent::new(DomainEventKind::TaskCreated {
            task_id: task.id(),
            project_id: self.id(),
            title: task.title().to_string(),
            user_id,
        });

        self.tasks.push(task);
        self.base.record(event);

        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Remove a task and raise `TaskRemoved`
    ///
    /// The task's own buffered events are discarded with it.
    pub fn remove_task(&mut self, task_id: Uuid) -> Result<()> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id() == task_id)
            .ok_or_else(|| Error::NotFound("Task not found in this project".to_string()))?;

        self.tasks.remove(index);
        self.base.record(DomainEvent::new(DomainEventKind::TaskRemoved {
            task_id,
            project_id: self.id(),
        }));
        Ok(())
    }

    /// A project can be deleted once none of its tasks is pending
    pub fn can_be_deleted(&self) -> bool {
        !self.tasks.iter().any(|t| t.status().is_pending())
    }

    pub fn pending_task_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.status().is_pending()).count()
    }

    /// Drain the root buffer first, then every task buffer in task order
    pub fn take_all_domain_events(&mut self) -> Vec<DomainEvent> {
        let mut events = self.base.take_events();
        for task in &mut self.tasks {
            events.extend(task.take_domain_events());
        }
        events
    }

    /// Clear the root buffer and every task buffer
    pub fn clear_all_domain_events(&mut self) {
        self.base.clear_events();
        for task in &mut self.tasks {
            task.clear_domain_events();
        }
    }
}

impl Entity for Project {
    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }
}

//! Domain events raised by the project aggregate
//!
//! Events are buffered on the entity that raised them and handed to an
//! [`taskboard_events::EventSink`] after the aggregate has been saved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskboard_common::Result;
use taskboard_events::OutboundEvent;

use crate::domain::values::TaskStatus;

/// Something that happened to a project or one of its tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: DomainEventKind,
}

/// Event payloads, tagged by event name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEventKind {
    ProjectCreated {
        project_id: Uuid,
        title: String,
        owner_id: Uuid,
    },
    TaskCreated {
        task_id: Uuid,
        project_id: Uuid,
        title: String,
        user_id: Uuid,
    },
    TaskUpdated {
        task_id: Uuid,
        project_id: Uuid,
        user_id: Uuid,
    },
    TaskStatusChanged {
        task_id: Uuid,
        project_id: Uuid,
        old_status: TaskStatus,
        new_status: TaskStatus,
        user_id: Uuid,
    },
    TaskCommentAdded {
        task_id: Uuid,
        project_id: Uuid,
        user_id: Uuid,
        content: String,
    },
    TaskRemoved {
        task_id: Uuid,
        project_id: Uuid,
    },
}

impl DomainEvent {
    /// Stamp a payload with a fresh identifier and the current instant
    pub fn new(kind: DomainEventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            kind,
        }
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            DomainEventKind::ProjectCreated { .. } => "ProjectCreated",
            DomainEventKind::TaskCreated { .. } => "TaskCreated",
            DomainEventKind::TaskUpdated { .. } => "TaskUpdated",
            DomainEventKind::TaskStatusChanged { .. } => "TaskStatusChanged",
            DomainEventKind::TaskCommentAdded { .. } => "TaskCommentAdded",
            DomainEventKind::TaskRemoved { .. } => "TaskRemoved",
        }
    }

    /// Project the event targets
    pub fn project_id(&self) -> Uuid {
        match self.kind {
            DomainEventKind::ProjectCreated { project_id, .. }
            | DomainEventKind::TaskCreated { project_id, .. }
            | DomainEventKind::TaskUpdated { project_id, .. }
            | DomainEventKind::TaskStatusChanged { project_id, .. }
            | DomainEventKind::TaskCommentAdded { project_id, .. }
            | DomainEventKind::TaskRemoved { project_id, .. } => project_id,
        }
    }

    /// Convert into the transport form consumed by event sinks
    pub fn to_outbound(&self) -> Result<OutboundEvent> {
        Ok(OutboundEvent {
            id: self.id,
            name: self.name().to_string(),
            occurred_at: self.occurred_at,
            data: serde_json::to_value(&self.kind)?,
        })
    }
}

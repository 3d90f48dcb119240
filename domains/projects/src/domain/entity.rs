//! Identity and audit base shared by every entity
//!
//! Each entity embeds an [`EntityBase`] and implements [`Entity`] to expose
//! its identity, audit timestamps and outgoing domain event buffer.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::events::DomainEvent;

/// Identity, audit timestamps and outgoing event buffer of one entity.
///
/// The identifier and creation timestamp are fixed at construction. The event
/// buffer is transient: it is never persisted and is emptied by
/// [`EntityBase::take_events`] once per persistence cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityBase {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    events: Vec<DomainEvent>,
}

impl EntityBase {
    /// Fresh identity, created now, never modified
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: None,
            events: Vec::new(),
        }
    }

    /// Rebuild a persisted identity. The event buffer starts empty.
    pub fn restore(id: Uuid, created_at: DateTime<Utc>, updated_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            created_at,
            updated_at,
            events: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Stamp the last-modified time with the current instant
    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    /// Append an event to the outgoing buffer
    pub fn record(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[DomainEvent] {
        &self.events
    }

    /// Drain the buffer, returning events in append order
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl Default for EntityBase {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared contract of every entity, provided on top of its [`EntityBase`].
pub trait Entity {
    fn base(&self) -> &EntityBase;

    fn base_mut(&mut self) -> &mut EntityBase;

    fn id(&self) -> Uuid {
        self.base().id()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.base().created_at()
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.base().updated_at()
    }

    /// Events buffered since the last drain
    fn domain_events(&self) -> &[DomainEvent] {
        self.base().events()
    }

    /// Take-and-clear: the only way events leave an entity
    fn take_domain_events(&mut self) -> Vec<DomainEvent> {
        self.base_mut().take_events()
    }

    fn clear_domain_events(&mut self) {
        self.base_mut().clear_events();
    }
}

//! Users as seen by the Projects domain: read-only

use chrono::{DateTime, Utc};
use uuid::Uuid;

use taskboard_common::{Error, Result};

use crate::domain::entity::{Entity, EntityBase};
use crate::domain::values::UserRole;

/// User entity
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    base: EntityBase,
    name: String,
    email: String,
    role: UserRole,
}

impl User {
    pub fn new(name: Option<String>, email: Option<String>, role: UserRole) -> Result<Self> {
        let name = name.ok_or_else(|| Error::Validation("Name is required".to_string()))?;
        let email = email.ok_or_else(|| Error::Validation("Email is required".to_string()))?;

        Ok(Self {
            base: EntityBase::new(),
            name,
            email,
            role,
        })
    }

    /// Rebuild a persisted user
    pub fn restore(
        id: Uuid,
        name: String,
        email: String,
        role: UserRole,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            base: EntityBase::restore(id, created_at, updated_at),
            name,
            email,
            role,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn is_manager(&self) -> bool {
        self.role == UserRole::Manager
    }
}

impl Entity for User {
    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }
}

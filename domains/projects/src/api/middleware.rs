//! Projects domain state

use crate::service::ProjectService;

/// Application state for the Projects domain
#[derive(Clone)]
pub struct ProjectsState {
    pub service: ProjectService,
}

impl ProjectsState {
    pub fn new(service: ProjectService) -> Self {
        Self { service }
    }
}

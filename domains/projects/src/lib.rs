//! Projects domain: projects, tasks, comments, task history, performance reports

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entity::{Entity, EntityBase};
pub use domain::events::{DomainEvent, DomainEventKind};
pub use domain::project::{Project, ProjectParts, MAX_TASKS_PER_PROJECT};
pub use domain::report::{CompletionAverage, PerformanceReport, ReportWindow};
pub use domain::task::{Task, TaskComment, TaskHistory, TaskParts};
pub use domain::user::User;
pub use domain::values::{TaskPriority, TaskStatus, UserRole};

// Re-export repository types
pub use repository::{
    InMemoryStore, PgProjectStore, PgUserDirectory, ProjectStore, ProjectsRepositories,
    UserDirectory,
};

// Re-export service types
pub use service::{CreateProject, CreateTask, ProjectService, UpdateTask};

// Re-export API types
pub use api::routes;
pub use api::ProjectsState;

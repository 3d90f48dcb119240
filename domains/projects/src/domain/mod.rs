//! Projects domain layer: entity base, value types, aggregate, events, reports

pub mod entity;
pub mod events;
pub mod project;
pub mod report;
pub mod task;
pub mod user;
pub mod values;

//! HTTP handlers for the Projects domain

pub mod projects;
pub mod reports;
pub mod tasks;

//! Shared utilities, configuration, and error handling for Taskboard
//!
//! This crate provides common functionality used across the Taskboard service:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - Repository error types
//! - Request extractors

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::{ValidatedJson, ValidatedQuery};

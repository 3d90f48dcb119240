//! API endpoint integration tests
//!
//! Drives the composed router over in-memory stores: projects, tasks, reports.

#![allow(dead_code)]

mod common;
mod projects;
mod reports;
mod tasks;

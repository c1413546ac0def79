//! Persistence layer for Coach Tracker backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - SQL migrations, applied at startup

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;

//! Domain layer for the Coach Tracker backend.
//!
//! This crate contains:
//! - Domain models (Invitation, Notification, User, Player, TrainingSession)
//! - Pure business logic: renewal fan-out planning, chart computation
//! - The clock abstraction used to evaluate invitation expiry

pub mod models;
pub mod services;

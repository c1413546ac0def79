//! Shared utilities for the Coach Tracker backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Random token generation and hashing
//! - Password hashing with Argon2id
//! - Numeric validation for training statistics

pub mod crypto;
pub mod password;
pub mod validation;

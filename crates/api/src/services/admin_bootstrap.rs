//! Admin bootstrap.
//!
//! Creates a user or locates an existing one by email and grants it the admin
//! role. Used by `POST /api/admin/bootstrap` and, when configured, at startup.

use chrono::{DateTime, Utc};
use domain::models::user::normalize_email;
use persistence::repositories::UserRepository;
use shared::password::{hash_password, PasswordError};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AdminConfig;
use crate::error::ApiError;

/// Error types for admin bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),
}

impl From<BootstrapError> for ApiError {
    fn from(err: BootstrapError) -> Self {
        match err {
            BootstrapError::Database(e) => e.into(),
            BootstrapError::PasswordHash(e) => e.into(),
        }
    }
}

/// Outcome of a bootstrap call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapOutcome {
    pub user_id: Uuid,
    /// False when an existing user was promoted.
    pub created: bool,
}

/// Ensures a user with this email exists and has the admin role.
///
/// An existing user keeps their password; only the role changes. The insert
/// and the promotion are one statement, so concurrent bootstraps of the same
/// email all resolve to the same user.
pub async fn bootstrap_admin(
    pool: &PgPool,
    email: &str,
    password: &str,
    now: DateTime<Utc>,
) -> Result<BootstrapOutcome, BootstrapError> {
    let email = normalize_email(email);
    let password_hash = hash_password(password)?;

    let (user_id, created) = UserRepository::new(pool.clone())
        .upsert_admin(&email, &password_hash, now)
        .await?;
    let outcome = BootstrapOutcome { user_id, created };

    info!(
        email = %email,
        user_id = %outcome.user_id,
        created = outcome.created,
        "Admin role granted"
    );

    Ok(outcome)
}

/// Ensures the admin from configuration exists. Does nothing when unset.
pub async fn bootstrap_admin_from_config(
    pool: &PgPool,
    config: &AdminConfig,
    now: DateTime<Utc>,
) -> Result<(), BootstrapError> {
    if config.bootstrap_email.is_empty() {
        return Ok(());
    }

    if config.bootstrap_password.is_empty() {
        warn!(
            "CT__ADMIN__BOOTSTRAP_EMAIL is set but CT__ADMIN__BOOTSTRAP_PASSWORD is empty - skipping bootstrap"
        );
        return Ok(());
    }

    bootstrap_admin(pool, &config.bootstrap_email, &config.bootstrap_password, now).await?;

    warn!(
        "SECURITY: Remove CT__ADMIN__BOOTSTRAP_EMAIL and CT__ADMIN__BOOTSTRAP_PASSWORD \
         from configuration after initial setup"
    );

    Ok(())
}

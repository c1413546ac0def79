//! Password login.

use axum::{extract::State, Json};
use domain::models::user::normalize_email;
use domain::models::{LoginRequest, LoginResponse, UserRole};
use persistence::repositories::UserRepository;
use shared::password::verify_password;
use tracing::{info, warn};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::JsonBody;

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid email or password".to_string())
}

/// Check an email and password against the user directory.
///
/// POST /api/auth/login
///
/// Unknown emails, accounts without a password and wrong passwords all get
/// the same 401.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (email, password) = request
        .credentials()
        .ok_or_else(|| ApiError::Validation("email and password required".to_string()))?;

    let repo = UserRepository::new(state.pool.clone());
    let Some(user) = repo.find_by_email(&normalize_email(email)).await? else {
        warn!("Login attempt for unknown email");
        return Err(invalid_credentials());
    };

    let hash = user.password_hash.as_deref().ok_or_else(invalid_credentials)?;
    if !verify_password(password, hash)? {
        warn!(user_id = %user.id, "Login rejected: wrong password");
        return Err(invalid_credentials());
    }

    let role = UserRole::from(user.role);
    info!(user_id = %user.id, role = %role, "User logged in");

    Ok(Json(LoginResponse {
        ok: true,
        user_id: user.id,
        role,
    }))
}

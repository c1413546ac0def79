//! Admin routes, all guarded by the setup token.

use axum::{extract::State, Json};
use domain::models::user::{AdminUserResponse, UpdateRoleRequest};
use domain::models::{AdminOverview, BootstrapAdminRequest, UserActivity};
use persistence::entities::UserRoleDb;
use persistence::repositories::UserRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, PathParams, SetupToken};
use crate::services::admin_bootstrap::bootstrap_admin;

/// Create or promote an admin account.
///
/// POST /api/admin/bootstrap
pub async fn bootstrap(
    State(state): State<AppState>,
    _token: SetupToken,
    JsonBody(request): JsonBody<BootstrapAdminRequest>,
) -> Result<Json<AdminUserResponse>, ApiError> {
    let (email, password) = match (request.email.as_deref(), request.password.as_deref()) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => {
            return Err(ApiError::Validation(
                "email and password required".to_string(),
            ))
        }
    };
    request.validate()?;

    let outcome = bootstrap_admin(&state.pool, email, password, state.clock.now()).await?;

    Ok(Json(AdminUserResponse {
        ok: true,
        user_id: outcome.user_id,
        role: None,
    }))
}

/// Change a user's role.
///
/// POST /api/admin/users/:id/role
pub async fn update_user_role(
    State(state): State<AppState>,
    _token: SetupToken,
    PathParams(user_id): PathParams<Uuid>,
    JsonBody(request): JsonBody<UpdateRoleRequest>,
) -> Result<Json<AdminUserResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .set_role(user_id, UserRoleDb::from(request.role), state.clock.now())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(user_id = %user.id, role = %request.role, "User role changed");

    Ok(Json(AdminUserResponse {
        ok: true,
        user_id: user.id,
        role: Some(request.role),
    }))
}

/// Coaches and players with their latest training activity.
///
/// GET /api/admin/overview
pub async fn overview(
    State(state): State<AppState>,
    _token: SetupToken,
) -> Result<Json<AdminOverview>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());

    let coaches = repo
        .list_activity_by_role(UserRoleDb::Coach)
        .await?
        .into_iter()
        .map(UserActivity::from)
        .collect();
    let players = repo
        .list_activity_by_role(UserRoleDb::Player)
        .await?
        .into_iter()
        .map(UserActivity::from)
        .collect();

    Ok(Json(AdminOverview { coaches, players }))
}

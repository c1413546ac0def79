//! Training session routes.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::training_session::{CreateSessionRequest, UpdateSessionRequest};
use domain::models::TrainingSession;
use persistence::repositories::{PlayerRepository, TrainingSessionRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, PathParams};
use crate::middleware::metrics::record_training_session_logged;
use crate::routes::players::player_not_found;

fn session_not_found() -> ApiError {
    ApiError::NotFound("Session not found".to_string())
}

/// Log a session for a player.
///
/// POST /api/players/:id/sessions
pub async fn create_session(
    State(state): State<AppState>,
    PathParams(player_id): PathParams<Uuid>,
    JsonBody(request): JsonBody<CreateSessionRequest>,
) -> Result<(StatusCode, Json<TrainingSession>), ApiError> {
    request.validate()?;

    let players = PlayerRepository::new(state.pool.clone());
    if players.find_by_id(player_id).await?.is_none() {
        return Err(player_not_found());
    }

    let now = state.clock.now();
    let new_session = request
        .into_new_session(now)
        .ok_or_else(|| ApiError::Validation("Missing required session fields".to_string()))?;

    let repo = TrainingSessionRepository::new(state.pool.clone());
    let session = repo.create(player_id, &new_session, now).await?;

    info!(
        session_id = %session.id,
        player_id = %player_id,
        map = %session.map_name,
        "Training session logged"
    );
    record_training_session_logged();

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// List a player's sessions, oldest first.
///
/// GET /api/players/:id/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    PathParams(player_id): PathParams<Uuid>,
) -> Result<Json<Vec<TrainingSession>>, ApiError> {
    let players = PlayerRepository::new(state.pool.clone());
    if players.find_by_id(player_id).await?.is_none() {
        return Err(player_not_found());
    }

    let repo = TrainingSessionRepository::new(state.pool.clone());
    let sessions = repo
        .list_for_player(player_id)
        .await?
        .into_iter()
        .map(TrainingSession::from)
        .collect();

    Ok(Json(sessions))
}

/// Partially update a session.
///
/// PUT /api/sessions/:id
pub async fn update_session(
    State(state): State<AppState>,
    PathParams(session_id): PathParams<Uuid>,
    JsonBody(request): JsonBody<UpdateSessionRequest>,
) -> Result<Json<TrainingSession>, ApiError> {
    request.validate()?;

    let repo = TrainingSessionRepository::new(state.pool.clone());
    let mut session: TrainingSession = repo
        .find_by_id(session_id)
        .await?
        .ok_or_else(session_not_found)?
        .into();

    request.apply_to(&mut session);

    let updated = repo
        .update(&session)
        .await?
        .ok_or_else(session_not_found)?;

    info!(session_id = %session_id, "Training session updated");
    Ok(Json(updated.into()))
}

/// DELETE /api/sessions/:id
pub async fn delete_session(
    State(state): State<AppState>,
    PathParams(session_id): PathParams<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = TrainingSessionRepository::new(state.pool.clone());
    if repo.delete(session_id).await? == 0 {
        return Err(session_not_found());
    }

    info!(session_id = %session_id, "Training session deleted");
    Ok(StatusCode::NO_CONTENT)
}

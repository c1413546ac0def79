//! Player roster routes.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::player::{CreatePlayerRequest, ListPlayersQuery};
use domain::models::Player;
use persistence::repositories::PlayerRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, PathParams, QueryParams};

pub(crate) fn player_not_found() -> ApiError {
    ApiError::NotFound("Player not found".to_string())
}

/// Add a player to a coach's roster.
///
/// POST /api/players
pub async fn create_player(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    request.validate()?;

    let repo = PlayerRepository::new(state.pool.clone());
    let player = repo
        .create(
            request.coach_id,
            request.user_id,
            request.player_name.trim(),
            state.clock.now(),
        )
        .await?;

    info!(
        player_id = %player.id,
        coach_id = %player.coach_id,
        "Player created"
    );

    Ok((StatusCode::CREATED, Json(player.into())))
}

/// List a coach's players.
///
/// GET /api/players?coach=<uuid>
pub async fn list_players(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListPlayersQuery>,
) -> Result<Json<Vec<Player>>, ApiError> {
    let coach_id = query
        .coach
        .ok_or_else(|| ApiError::Validation("coach required".to_string()))?;

    let repo = PlayerRepository::new(state.pool.clone());
    let players = repo
        .list_by_coach(coach_id)
        .await?
        .into_iter()
        .map(Player::from)
        .collect();

    Ok(Json(players))
}

/// GET /api/players/:id
pub async fn get_player(
    State(state): State<AppState>,
    PathParams(player_id): PathParams<Uuid>,
) -> Result<Json<Player>, ApiError> {
    let repo = PlayerRepository::new(state.pool.clone());
    let player = repo
        .find_by_id(player_id)
        .await?
        .ok_or_else(player_not_found)?;

    Ok(Json(player.into()))
}

/// Remove a player and, through the cascade, their sessions.
///
/// DELETE /api/players/:id
pub async fn delete_player(
    State(state): State<AppState>,
    PathParams(player_id): PathParams<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = PlayerRepository::new(state.pool.clone());
    if repo.delete(player_id).await? == 0 {
        return Err(player_not_found());
    }

    info!(player_id = %player_id, "Player deleted");
    Ok(StatusCode::NO_CONTENT)
}

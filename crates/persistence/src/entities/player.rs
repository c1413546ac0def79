//! Player entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the players table.
#[derive(Debug, Clone, FromRow)]
pub struct PlayerEntity {
    pub id: Uuid,
    pub coach_id: Uuid,
    pub user_id: Option<Uuid>,
    pub player_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlayerEntity> for domain::models::Player {
    fn from(entity: PlayerEntity) -> Self {
        Self {
            id: entity.id,
            coach_id: entity.coach_id,
            user_id: entity.user_id,
            player_name: entity.player_name,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

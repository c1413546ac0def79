//! Training session entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the training_sessions table.
#[derive(Debug, Clone, FromRow)]
pub struct TrainingSessionEntity {
    pub id: Uuid,
    pub player_id: Uuid,
    pub session_date: DateTime<Utc>,
    pub hs_rate: f64,
    pub kills: i32,
    pub deaths: i32,
    pub accuracy: Option<f64>,
    pub map_name: String,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
    pub exercise_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<TrainingSessionEntity> for domain::models::TrainingSession {
    fn from(entity: TrainingSessionEntity) -> Self {
        Self {
            id: entity.id,
            player_id: entity.player_id,
            session_date: entity.session_date,
            hs_rate: entity.hs_rate,
            kills: entity.kills,
            deaths: entity.deaths,
            accuracy: entity.accuracy,
            map_name: entity.map_name,
            duration_minutes: entity.duration_minutes,
            notes: entity.notes,
            exercise_type: entity.exercise_type,
            created_at: entity.created_at,
        }
    }
}

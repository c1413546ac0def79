//! Training session repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::training_session::NewTrainingSession;
use domain::models::TrainingSession;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::TrainingSessionEntity;
use crate::metrics::QueryTimer;

const SESSION_COLUMNS: &str = "id, player_id, session_date, hs_rate, kills, deaths, accuracy, \
     map_name, duration_minutes, notes, exercise_type, created_at";

/// Repository for training session database operations.
#[derive(Clone)]
pub struct TrainingSessionRepository {
    pool: PgPool,
}

impl TrainingSessionRepository {
    /// Creates a new TrainingSessionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Log a session for a player.
    pub async fn create(
        &self,
        player_id: Uuid,
        session: &NewTrainingSession,
        now: DateTime<Utc>,
    ) -> Result<TrainingSessionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_training_session");
        let result = sqlx::query_as::<_, TrainingSessionEntity>(&format!(
            r#"
            INSERT INTO training_sessions (
                player_id, session_date, hs_rate, kills, deaths, accuracy,
                map_name, duration_minutes, notes, exercise_type, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(player_id)
        .bind(session.session_date)
        .bind(session.hs_rate)
        .bind(session.kills)
        .bind(session.deaths)
        .bind(session.accuracy)
        .bind(&session.map_name)
        .bind(session.duration_minutes)
        .bind(&session.notes)
        .bind(&session.exercise_type)
        .bind(now)
        .fetch_one(&self.pool)
        .await;
        timer.record(&result);
        result
    }

    /// Find session by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TrainingSessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_training_session_by_id");
        let result = sqlx::query_as::<_, TrainingSessionEntity>(&format!(
            "SELECT {SESSION_COLUMNS} FROM training_sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record(&result);
        result
    }

    /// List a player's sessions, oldest first.
    pub async fn list_for_player(
        &self,
        player_id: Uuid,
    ) -> Result<Vec<TrainingSessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_training_sessions_for_player");
        let result = sqlx::query_as::<_, TrainingSessionEntity>(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM training_sessions
            WHERE player_id = $1
            ORDER BY session_date, created_at
            "#
        ))
        .bind(player_id)
        .fetch_all(&self.pool)
        .await;
        timer.record(&result);
        result
    }

    /// Write back every editable field of a session.
    pub async fn update(
        &self,
        session: &TrainingSession,
    ) -> Result<Option<TrainingSessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_training_session");
        let result = sqlx::query_as::<_, TrainingSessionEntity>(&format!(
            r#"
            UPDATE training_sessions
            SET session_date = $2, hs_rate = $3, kills = $4, deaths = $5, accuracy = $6,
                map_name = $7, duration_minutes = $8, notes = $9, exercise_type = $10
            WHERE id = $1
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(session.id)
        .bind(session.session_date)
        .bind(session.hs_rate)
        .bind(session.kills)
        .bind(session.deaths)
        .bind(session.accuracy)
        .bind(&session.map_name)
        .bind(session.duration_minutes)
        .bind(&session.notes)
        .bind(&session.exercise_type)
        .fetch_optional(&self.pool)
        .await;
        timer.record(&result);
        result
    }

    /// Delete a session.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_training_session");
        let result = sqlx::query("DELETE FROM training_sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|done| done.rows_affected());
        timer.record(&result);
        result
    }
}

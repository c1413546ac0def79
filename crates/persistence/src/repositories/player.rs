//! Player repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PlayerEntity;
use crate::metrics::QueryTimer;

/// Repository for player-related database operations.
#[derive(Clone)]
pub struct PlayerRepository {
    pool: PgPool,
}

impl PlayerRepository {
    /// Creates a new PlayerRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a player to a coach's roster.
    pub async fn create(
        &self,
        coach_id: Uuid,
        user_id: Option<Uuid>,
        player_name: &str,
        now: DateTime<Utc>,
    ) -> Result<PlayerEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_player");
        let result = sqlx::query_as::<_, PlayerEntity>(
            r#"
            INSERT INTO players (coach_id, user_id, player_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, coach_id, user_id, player_name, created_at, updated_at
            "#,
        )
        .bind(coach_id)
        .bind(user_id)
        .bind(player_name)
        .bind(now)
        .fetch_one(&self.pool)
        .await;
        timer.record(&result);
        result
    }

    /// Find player by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PlayerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_player_by_id");
        let result = sqlx::query_as::<_, PlayerEntity>(
            r#"
            SELECT id, coach_id, user_id, player_name, created_at, updated_at
            FROM players
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record(&result);
        result
    }

    /// List a coach's players by name.
    pub async fn list_by_coach(&self, coach_id: Uuid) -> Result<Vec<PlayerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_players_by_coach");
        let result = sqlx::query_as::<_, PlayerEntity>(
            r#"
            SELECT id, coach_id, user_id, player_name, created_at, updated_at
            FROM players
            WHERE coach_id = $1
            ORDER BY LOWER(player_name), created_at
            "#,
        )
        .bind(coach_id)
        .fetch_all(&self.pool)
        .await;
        timer.record(&result);
        result
    }

    /// Delete a player and, by cascade, their sessions.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_player");
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|done| done.rows_affected());
        timer.record(&result);
        result
    }
}

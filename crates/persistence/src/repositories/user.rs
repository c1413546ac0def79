//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::entities::{UserActivityEntity, UserEntity, UserRoleDb};
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str = "id, email, password_hash, display_name, role, created_at, updated_at";

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user.
    pub async fn create(
        &self,
        email: &str,
        password_hash: Option<&str>,
        display_name: Option<&str>,
        role: UserRoleDb,
        now: DateTime<Utc>,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            INSERT INTO users (email, password_hash, display_name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(password_hash)
        .bind(display_name)
        .bind(role)
        .bind(now)
        .fetch_one(&self.pool)
        .await;
        timer.record(&result);
        result
    }

    /// Find user by email, case-insensitively.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await;
        timer.record(&result);
        result
    }

    /// Change a user's role.
    pub async fn set_role(
        &self,
        id: Uuid,
        role: UserRoleDb,
        now: DateTime<Utc>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_user_role");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            UPDATE users
            SET role = $2, updated_at = $3
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(role)
        .bind(now)
        .fetch_optional(&self.pool)
        .await;
        timer.record(&result);
        result
    }

    /// Inserts an admin or, when the email is already registered in any
    /// casing, promotes that user and leaves the password untouched.
    ///
    /// Returns the user id and whether a new row was inserted.
    pub async fn upsert_admin(
        &self,
        email: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<(Uuid, bool), sqlx::Error> {
        let timer = QueryTimer::new("upsert_admin_user");
        let result = sqlx::query_as::<_, (Uuid, bool)>(
            r#"
            INSERT INTO users (email, password_hash, display_name, role, created_at, updated_at)
            VALUES ($1, $2, NULL, $3, $4, $4)
            ON CONFLICT ((LOWER(email)))
            DO UPDATE SET role = EXCLUDED.role, updated_at = EXCLUDED.updated_at
            RETURNING id, (xmax = 0) AS inserted
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(UserRoleDb::Admin)
        .bind(now)
        .fetch_one(&self.pool)
        .await;
        timer.record(&result);
        result
    }

    /// Users with a role and the date of their latest session.
    ///
    /// For coaches that is the latest session of any player on their roster;
    /// for players it is the latest session of the player rows linked to them.
    pub async fn list_activity_by_role(
        &self,
        role: UserRoleDb,
    ) -> Result<Vec<UserActivityEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_user_activity_by_role");
        let result = sqlx::query_as::<_, UserActivityEntity>(
            r#"
            SELECT
                u.id, u.email, u.display_name, u.role,
                (
                    SELECT MAX(s.session_date)
                    FROM training_sessions s
                    JOIN players p ON p.id = s.player_id
                    WHERE p.coach_id = u.id OR p.user_id = u.id
                ) AS last_session_date
            FROM users u
            WHERE u.role = $1
            ORDER BY LOWER(u.email)
            "#,
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await;
        timer.record(&result);
        result
    }
}

/// IDs of every current admin, oldest account first.
///
/// Takes any executor so the renewal fan-out can read admins inside its
/// own transaction.
pub async fn admin_ids<'e, E>(executor: E) -> Result<Vec<Uuid>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let timer = QueryTimer::new("list_admin_ids");
    let result = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM users WHERE role = $1 ORDER BY created_at, id",
    )
    .bind(UserRoleDb::Admin)
    .fetch_all(executor)
    .await;
    timer.record(&result);
    result
}

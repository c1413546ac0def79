//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::UserRole;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for user_role that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRoleDb {
    Admin,
    Coach,
    Player,
}

impl From<UserRoleDb> for UserRole {
    fn from(db_role: UserRoleDb) -> Self {
        match db_role {
            UserRoleDb::Admin => UserRole::Admin,
            UserRoleDb::Coach => UserRole::Coach,
            UserRoleDb::Player => UserRole::Player,
        }
    }
}

impl From<UserRole> for UserRoleDb {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => UserRoleDb::Admin,
            UserRole::Coach => UserRoleDb::Coach,
            UserRole::Player => UserRoleDb::Player,
        }
    }
}

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub display_name: Option<String>,
    pub role: UserRoleDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for domain::models::User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            password_hash: entity.password_hash,
            display_name: entity.display_name,
            role: entity.role.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// User row joined with the date of their latest training session.
#[derive(Debug, Clone, FromRow)]
pub struct UserActivityEntity {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub role: UserRoleDb,
    pub last_session_date: Option<DateTime<Utc>>,
}

impl From<UserActivityEntity> for domain::models::UserActivity {
    fn from(entity: UserActivityEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            display_name: entity.display_name,
            role: entity.role.into(),
            last_session_date: entity.last_session_date,
        }
    }
}

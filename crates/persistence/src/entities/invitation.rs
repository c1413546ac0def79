//! Invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::InvitationStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for invitation_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invitation_status", rename_all = "snake_case")]
pub enum InvitationStatusDb {
    Pending,
    Sent,
    RenewRequested,
    Cancelled,
    Accepted,
    Expired,
}

impl From<InvitationStatusDb> for InvitationStatus {
    fn from(db_status: InvitationStatusDb) -> Self {
        match db_status {
            InvitationStatusDb::Pending => InvitationStatus::Pending,
            InvitationStatusDb::Sent => InvitationStatus::Sent,
            InvitationStatusDb::RenewRequested => InvitationStatus::RenewRequested,
            InvitationStatusDb::Cancelled => InvitationStatus::Cancelled,
            InvitationStatusDb::Accepted => InvitationStatus::Accepted,
            InvitationStatusDb::Expired => InvitationStatus::Expired,
        }
    }
}

impl From<InvitationStatus> for InvitationStatusDb {
    fn from(status: InvitationStatus) -> Self {
        match status {
            InvitationStatus::Pending => InvitationStatusDb::Pending,
            InvitationStatus::Sent => InvitationStatusDb::Sent,
            InvitationStatus::RenewRequested => InvitationStatusDb::RenewRequested,
            InvitationStatus::Cancelled => InvitationStatusDb::Cancelled,
            InvitationStatus::Accepted => InvitationStatusDb::Accepted,
            InvitationStatus::Expired => InvitationStatusDb::Expired,
        }
    }
}

/// Database row mapping for the invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationEntity {
    pub id: Uuid,
    pub email: String,
    pub token: String,
    pub status: InvitationStatusDb,
    pub invited_by: Uuid,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<InvitationEntity> for domain::models::Invitation {
    fn from(entity: InvitationEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            token: entity.token,
            status: entity.status.into(),
            invited_by: entity.invited_by,
            role: entity.role,
            created_at: entity.created_at,
            expires_at: entity.expires_at,
        }
    }
}

//! Notification entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the notifications table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    pub notification_type: String,
    pub message: String,
    pub recipient_user_id: Uuid,
    pub related_invitation_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationEntity> for domain::models::Notification {
    fn from(entity: NotificationEntity) -> Self {
        Self {
            id: entity.id,
            notification_type: entity.notification_type,
            message: entity.message,
            recipient_user_id: entity.recipient_user_id,
            related_invitation_id: entity.related_invitation_id,
            created_at: entity.created_at,
        }
    }
}

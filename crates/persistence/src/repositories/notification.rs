//! Notification repository for database operations.
//!
//! Notifications are only written by the renewal fan-out in
//! [`InvitationRepository::request_renewal`](super::InvitationRepository::request_renewal).

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::NotificationEntity;
use crate::metrics::QueryTimer;

/// Repository for notification-related database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Creates a new NotificationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a recipient's notifications, newest first.
    pub async fn list_for_recipient(
        &self,
        recipient_user_id: Uuid,
    ) -> Result<Vec<NotificationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_notifications_for_recipient");
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            SELECT id, type, message, recipient_user_id, related_invitation_id, created_at
            FROM notifications
            WHERE recipient_user_id = $1
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(recipient_user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record(&result);
        result
    }
}

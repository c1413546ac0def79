//! Notification domain models.
//!
//! Notifications are an append-only inbox log: one row per recipient,
//! never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kinds of notification the backend produces.
///
/// The stored `type` column stays free text so older or foreign rows still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    InviteRenewalRequest,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::InviteRenewalRequest => "invite_renewal_request",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Notification {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub message: String,
    pub recipient_user_id: Uuid,
    pub related_invitation_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A notification about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub message: String,
    pub recipient_user_id: Uuid,
    pub related_invitation_id: Option<Uuid>,
}

/// Query for a recipient's inbox.
#[derive(Debug, Clone, Deserialize)]
pub struct ListNotificationsQuery {
    pub recipient: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_as_str() {
        assert_eq!(
            NotificationKind::InviteRenewalRequest.as_str(),
            "invite_renewal_request"
        );
        assert_eq!(
            NotificationKind::InviteRenewalRequest.to_string(),
            "invite_renewal_request"
        );
    }

    #[test]
    fn test_notification_serializes_type_field() {
        let notification = Notification {
            id: Uuid::new_v4(),
            notification_type: "invite_renewal_request".to_string(),
            message: "New invitation link requested for a@x.com".to_string(),
            recipient_user_id: Uuid::new_v4(),
            related_invitation_id: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["type"], "invite_renewal_request");
        assert!(json["related_invitation_id"].is_null());
        assert!(json.get("notification_type").is_none());
    }
}

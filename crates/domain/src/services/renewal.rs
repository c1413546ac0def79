//! Renewal-request fan-out planning.
//!
//! A renewal request notifies the original inviter and every admin known at
//! request time. Recipients are not deduplicated: an inviter who is also an
//! admin receives two rows, one per inbox role.

use uuid::Uuid;

use crate::models::{NewNotification, NotificationKind};

/// Inbox message shown for a renewal request.
pub fn renewal_request_message(email: &str) -> String {
    format!("New invitation link requested for {}", email)
}

/// Builds the notifications for one renewal request, inviter first.
///
/// Always yields `1 + admins.len()` rows, all pointing at `invitation_id`.
pub fn plan_renewal_notifications(
    invitation_id: Uuid,
    email: &str,
    invited_by: Uuid,
    admins: &[Uuid],
) -> Vec<NewNotification> {
    let message = renewal_request_message(email);

    std::iter::once(invited_by)
        .chain(admins.iter().copied())
        .map(|recipient| NewNotification {
            kind: NotificationKind::InviteRenewalRequest,
            message: message.clone(),
            recipient_user_id: recipient,
            related_invitation_id: Some(invitation_id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_without_admins_notifies_inviter_only() {
        let invitation_id = Uuid::new_v4();
        let coach = Uuid::new_v4();

        let plan = plan_renewal_notifications(invitation_id, "a@x.com", coach, &[]);

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].recipient_user_id, coach);
        assert_eq!(plan[0].related_invitation_id, Some(invitation_id));
        assert_eq!(plan[0].kind, NotificationKind::InviteRenewalRequest);
    }

    #[test]
    fn test_plan_counts_one_plus_admins() {
        let invitation_id = Uuid::new_v4();
        let coach = Uuid::new_v4();
        let admins: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

        let plan = plan_renewal_notifications(invitation_id, "a@x.com", coach, &admins);

        assert_eq!(plan.len(), 4);
        assert!(plan
            .iter()
            .all(|n| n.related_invitation_id == Some(invitation_id)));
        let recipients: Vec<Uuid> = plan.iter().map(|n| n.recipient_user_id).collect();
        assert_eq!(recipients[0], coach);
        assert_eq!(&recipients[1..], admins.as_slice());
    }

    #[test]
    fn test_plan_keeps_duplicate_when_inviter_is_admin() {
        let admin = Uuid::new_v4();
        let plan = plan_renewal_notifications(Uuid::new_v4(), "a@x.com", admin, &[admin]);

        assert_eq!(plan.len(), 2);
        assert!(plan.iter().all(|n| n.recipient_user_id == admin));
    }

    #[test]
    fn test_renewal_request_message_mentions_email() {
        assert_eq!(
            renewal_request_message("a@x.com"),
            "New invitation link requested for a@x.com"
        );
    }
}

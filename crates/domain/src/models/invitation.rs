//! Invitation domain models.
//!
//! An invitation is a single-table state machine. Its token is the only
//! credential the invitee holds, and expiry is always derived from
//! `expires_at` at read time: no operation ever stores `expired`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Number of random bytes in an invitation token (hex-encoded to 48 chars).
pub const INVITATION_TOKEN_BYTES: usize = 24;

/// Lifetime of a freshly issued or reissued token, in seconds.
pub const INVITATION_TTL_SECS: i64 = 60 * 60;

/// Role assigned when the inviter does not specify one.
pub const DEFAULT_INVITATION_ROLE: &str = "player";

/// Stored status of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Sent,
    RenewRequested,
    Cancelled,
    Accepted,
    /// Accepted by the store but never written by the lifecycle.
    Expired,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Sent => "sent",
            InvitationStatus::RenewRequested => "renew_requested",
            InvitationStatus::Cancelled => "cancelled",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Expired => "expired",
        }
    }

    /// Returns true if an invitee may still sign up with this invitation.
    pub fn is_open(&self) -> bool {
        matches!(self, InvitationStatus::Pending | InvitationStatus::Sent)
    }
}

impl FromStr for InvitationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvitationStatus::Pending),
            "sent" => Ok(InvitationStatus::Sent),
            "renew_requested" => Ok(InvitationStatus::RenewRequested),
            "cancelled" => Ok(InvitationStatus::Cancelled),
            "accepted" => Ok(InvitationStatus::Accepted),
            "expired" => Ok(InvitationStatus::Expired),
            _ => Err(format!("Invalid invitation status: {}", s)),
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents an invitation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Invitation {
    pub id: Uuid,
    pub email: String,
    pub token: String,
    pub status: InvitationStatus,
    pub invited_by: Uuid,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Invitation {
    /// Expired iff `now` is strictly past `expires_at`, whatever the stored status.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Builds the read view with the computed `expired` flag.
    pub fn view_at(self, now: DateTime<Utc>) -> InvitationView {
        let expired = self.is_expired_at(now);
        InvitationView {
            invitation: self,
            expired,
        }
    }
}

/// Invitation as returned by the API: the stored record plus `expired`.
#[derive(Debug, Clone, Serialize)]
pub struct InvitationView {
    #[serde(flatten)]
    pub invitation: Invitation,
    pub expired: bool,
}

/// Request to create a new invitation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitationRequest {
    #[validate(custom(function = "shared::validation::validate_email_address"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 32, message = "role must be 1-32 characters"))]
    pub role: Option<String>,

    pub invited_by: Option<Uuid>,
}

impl CreateInvitationRequest {
    /// Returns `(email, invited_by)` when both required fields are present.
    pub fn required_fields(&self) -> Option<(&str, Uuid)> {
        let email = self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())?;
        Some((email, self.invited_by?))
    }

    /// Role to store, falling back to the default.
    pub fn role_or_default(&self) -> &str {
        self.role
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_INVITATION_ROLE)
    }
}

/// Response after creating an invitation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateInvitationResponse {
    pub ok: bool,
    pub id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub link: String,
}

/// Response after approving a renewal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RenewalApprovedResponse {
    pub ok: bool,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub link: String,
}

/// Query for listing the invitations sent by one inviter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInvitationsQuery {
    pub invited_by: Option<Uuid>,
}

/// Request to create an account from an invitation link.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InvitationSignupRequest {
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Player name must be 1-100 characters"))]
    pub player_name: Option<String>,

    #[validate(length(max = 100, message = "Display name must be at most 100 characters"))]
    pub display_name: Option<String>,
}

/// Response after a successful invitation signup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationSignupResponse {
    pub ok: bool,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<Uuid>,
}

/// Generates a fresh bearer token for an invitation link.
pub fn generate_invitation_token() -> String {
    shared::crypto::random_hex_token(INVITATION_TOKEN_BYTES)
}

/// Expiry for a token issued at `issued_at`.
pub fn expiry_for(issued_at: DateTime<Utc>) -> DateTime<Utc> {
    issued_at + Duration::seconds(INVITATION_TTL_SECS)
}

/// Builds the signup link the invitee receives.
pub fn invite_link(app_base_url: &str, token: &str) -> String {
    format!("{}/invite/{}", app_base_url.trim_end_matches('/'), token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn sample(status: InvitationStatus, expires_at: DateTime<Utc>) -> Invitation {
        Invitation {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            token: generate_invitation_token(),
            status,
            invited_by: Uuid::new_v4(),
            role: DEFAULT_INVITATION_ROLE.to_string(),
            created_at: expires_at - Duration::hours(1),
            expires_at,
        }
    }

    #[test]
    fn test_generate_invitation_token_format() {
        let token = generate_invitation_token();
        assert_eq!(token.len(), 48);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_invitation_token_uniqueness() {
        let tokens: HashSet<String> = (0..200).map(|_| generate_invitation_token()).collect();
        assert_eq!(tokens.len(), 200);
    }

    #[test]
    fn test_expiry_is_one_hour_after_issue() {
        let issued = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(
            expiry_for(issued),
            Utc.with_ymd_and_hms(2025, 3, 1, 13, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_is_expired_boundary() {
        let expires = Utc.with_ymd_and_hms(2025, 3, 1, 13, 0, 0).unwrap();
        let invitation = sample(InvitationStatus::Pending, expires);

        assert!(!invitation.is_expired_at(expires - Duration::seconds(1)));
        assert!(!invitation.is_expired_at(expires));
        assert!(invitation.is_expired_at(expires + Duration::milliseconds(1)));
    }

    #[test]
    fn test_expired_flag_ignores_stored_status() {
        let expires = Utc.with_ymd_and_hms(2025, 3, 1, 13, 0, 0).unwrap();
        let later = expires + Duration::minutes(5);

        for status in [
            InvitationStatus::Pending,
            InvitationStatus::Accepted,
            InvitationStatus::Cancelled,
            InvitationStatus::RenewRequested,
        ] {
            let view = sample(status, expires).view_at(later);
            assert!(view.expired);
            assert_eq!(view.invitation.status, status);
        }

        let view = sample(InvitationStatus::Expired, expires).view_at(expires - Duration::minutes(1));
        assert!(!view.expired);
    }

    #[test]
    fn test_view_serializes_flat_record_with_expired() {
        let expires = Utc.with_ymd_and_hms(2025, 3, 1, 13, 0, 0).unwrap();
        let view = sample(InvitationStatus::RenewRequested, expires).view_at(expires);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["status"], "renew_requested");
        assert_eq!(json["expired"], false);
        assert_eq!(json["email"], "a@x.com");
        assert!(json["invited_by"].is_string());
        assert!(json.get("invitation").is_none());
    }

    #[test]
    fn test_status_roundtrip_strings() {
        for status in [
            InvitationStatus::Pending,
            InvitationStatus::Sent,
            InvitationStatus::RenewRequested,
            InvitationStatus::Cancelled,
            InvitationStatus::Accepted,
            InvitationStatus::Expired,
        ] {
            assert_eq!(status.as_str().parse::<InvitationStatus>().unwrap(), status);
        }
        assert!("revoked".parse::<InvitationStatus>().is_err());
    }

    #[test]
    fn test_status_is_open() {
        assert!(InvitationStatus::Pending.is_open());
        assert!(InvitationStatus::Sent.is_open());
        assert!(!InvitationStatus::RenewRequested.is_open());
        assert!(!InvitationStatus::Accepted.is_open());
        assert!(!InvitationStatus::Cancelled.is_open());
    }

    #[test]
    fn test_invite_link_format() {
        assert_eq!(
            invite_link("http://localhost:5173", "abc123"),
            "http://localhost:5173/invite/abc123"
        );
        assert_eq!(
            invite_link("https://coach.example.com/", "abc123"),
            "https://coach.example.com/invite/abc123"
        );
    }

    #[test]
    fn test_create_request_required_fields() {
        let coach = Uuid::new_v4();
        let request: CreateInvitationRequest = serde_json::from_value(serde_json::json!({
            "email": "a@x.com",
            "invitedBy": coach,
        }))
        .unwrap();
        assert_eq!(request.required_fields(), Some(("a@x.com", coach)));
        assert_eq!(request.role_or_default(), "player");
        assert!(request.validate().is_ok());

        let missing_inviter: CreateInvitationRequest =
            serde_json::from_value(serde_json::json!({ "email": "a@x.com" })).unwrap();
        assert!(missing_inviter.required_fields().is_none());

        let blank_email: CreateInvitationRequest = serde_json::from_value(serde_json::json!({
            "email": "  ",
            "invitedBy": coach,
        }))
        .unwrap();
        assert!(blank_email.required_fields().is_none());
    }

    #[test]
    fn test_create_request_role_override_and_email_validation() {
        let request: CreateInvitationRequest = serde_json::from_value(serde_json::json!({
            "email": "not-an-email",
            "role": "coach",
            "invitedBy": Uuid::new_v4(),
        }))
        .unwrap();
        assert_eq!(request.role_or_default(), "coach");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_accepts_padded_email() {
        let coach = Uuid::new_v4();
        let request: CreateInvitationRequest = serde_json::from_value(serde_json::json!({
            "email": " a@x.com ",
            "invitedBy": coach,
        }))
        .unwrap();
        assert_eq!(request.required_fields(), Some(("a@x.com", coach)));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_signup_request_validation() {
        let short: InvitationSignupRequest = serde_json::from_value(serde_json::json!({
            "password": "short",
            "playerName": "s1mple",
        }))
        .unwrap();
        assert!(short.validate().is_err());

        let ok: InvitationSignupRequest = serde_json::from_value(serde_json::json!({
            "password": "long-enough-pass",
            "playerName": "s1mple",
        }))
        .unwrap();
        assert!(ok.validate().is_ok());
    }
}

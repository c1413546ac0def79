//! User directory models.
//!
//! The `users` table stands in for an external identity provider: it holds
//! credentials and the role attribute used to find admins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Coach,
    Player,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Coach => "coach",
            UserRole::Player => "player",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "coach" => Ok(UserRole::Coach),
            "player" => Ok(UserRole::Player),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub display_name: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /api/admin/bootstrap`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BootstrapAdminRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: Option<String>,
}

/// Response for bootstrap and role changes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserResponse {
    pub ok: bool,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns `(email, password)` when both are present and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let email = self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((email, password))
    }
}

/// Response after a successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub ok: bool,
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Request to change a user's role.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

/// A user with the date of their latest training session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub role: UserRole,
    pub last_session_date: Option<DateTime<Utc>>,
}

/// Admin dashboard overview.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    pub coaches: Vec<UserActivity>,
    pub players: Vec<UserActivity>,
}

/// Normalizes an email for lookups and storage.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    #[test]
    fn test_user_role_from_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(" Coach ".parse::<UserRole>().unwrap(), UserRole::Coach);
        assert_eq!("PLAYER".parse::<UserRole>().unwrap(), UserRole::Player);
        assert!("owner".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_login_credentials_require_both_fields() {
        let request: LoginRequest = serde_json::from_value(serde_json::json!({
            "email": " coach@example.com ",
            "password": "Coach!Pass42",
        }))
        .unwrap();
        assert_eq!(
            request.credentials(),
            Some(("coach@example.com", "Coach!Pass42"))
        );

        let blank: LoginRequest =
            serde_json::from_value(serde_json::json!({ "email": "  ", "password": "x" })).unwrap();
        assert!(blank.credentials().is_none());

        let missing: LoginRequest =
            serde_json::from_value(serde_json::json!({ "email": "coach@example.com" })).unwrap();
        assert!(missing.credentials().is_none());
    }

    #[test]
    fn test_user_never_serializes_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "coach@example.com".to_string(),
            password_hash: Some("$argon2id$secret".to_string()),
            display_name: None,
            role: UserRole::Coach,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"role\":\"coach\""));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Coach@Example.COM "), "coach@example.com");

        let email: String = SafeEmail().fake();
        assert_eq!(normalize_email(&email.to_uppercase()), email.to_lowercase());
    }

    #[test]
    fn test_bootstrap_request_validation() {
        let request = BootstrapAdminRequest {
            email: Some("root@example.com".to_string()),
            password: Some("short".to_string()),
        };
        assert!(request.validate().is_err());

        let request = BootstrapAdminRequest {
            email: Some("root@example.com".to_string()),
            password: Some("long-enough-secret".to_string()),
        };
        assert!(request.validate().is_ok());
    }
}

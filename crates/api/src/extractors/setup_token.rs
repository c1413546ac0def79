//! Setup token extractor for admin operations.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use shared::crypto::secrets_match;

use crate::app::AppState;
use crate::error::ApiError;

/// Header carrying the admin setup secret.
pub const SETUP_TOKEN_HEADER: &str = "x-setup-token";

/// Proof that the request carried the configured setup token.
///
/// Rejects with 403 when the header is missing or wrong, and also when no
/// secret is configured at all.
#[derive(Debug, Clone, Copy)]
pub struct SetupToken;

impl SetupToken {
    /// Checks a presented header value against the configured secret.
    pub fn verify(presented: Option<&str>, configured: &str) -> Result<Self, ApiError> {
        match presented {
            Some(token) if !configured.is_empty() && secrets_match(token, configured) => {
                Ok(SetupToken)
            }
            _ => Err(ApiError::Forbidden("Forbidden".to_string())),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SetupToken {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(SETUP_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());

        Self::verify(presented, &state.config.admin.setup_token).map_err(|e| {
            tracing::warn!(path = %parts.uri.path(), "Rejected admin request with bad setup token");
            e
        })
    }
}

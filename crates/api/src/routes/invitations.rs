//! Invitation routes: issuing, reading, renewing and closing invitations.
//!
//! All invitation routes share one path segment, `:key`. Depending on the
//! operation it holds the bearer token (read, renewal request, signup) or the
//! invitation id (approve, accept, cancel). An id that is not a UUID cannot
//! match any invitation and yields the usual 404.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use domain::models::invitation::{
    expiry_for, generate_invitation_token, invite_link, CreateInvitationRequest,
    CreateInvitationResponse, InvitationSignupRequest, InvitationSignupResponse,
    ListInvitationsQuery, RenewalApprovedResponse,
};
use domain::models::user::normalize_email;
use domain::models::{Invitation, InvitationStatus, InvitationView, UserRole};
use persistence::entities::InvitationStatusDb;
use persistence::repositories::{
    InvitationRepository, InvitationSignup, SignupOutcome, UserRepository,
};
use shared::password::hash_password;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, PathParams, QueryParams};
use crate::middleware::metrics::{
    record_invitation_created, record_invitation_status_change, record_renewal_approved,
    record_renewal_requested,
};
use crate::routes::OkResponse;
use crate::services::email::{EmailService, InvitationEmailKind};

/// Create an invitation.
///
/// POST /api/invitations
pub async fn create_invitation(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateInvitationRequest>,
) -> Result<Json<CreateInvitationResponse>, ApiError> {
    let (email, invited_by) = request
        .required_fields()
        .ok_or_else(|| ApiError::Validation("email and invitedBy required".to_string()))?;
    request.validate()?;

    let repo = InvitationRepository::new(state.pool.clone());
    let token = repo
        .generate_unique_token(generate_invitation_token)
        .await?;

    let now = state.clock.now();
    let invitation = repo
        .create(
            email,
            &token,
            request.role_or_default(),
            invited_by,
            now,
            expiry_for(now),
        )
        .await?;

    let link = invite_link(&state.config.server.app_base_url, &invitation.token);

    info!(
        invitation_id = %invitation.id,
        invited_by = %invited_by,
        role = %invitation.role,
        expires_at = %invitation.expires_at,
        "Invitation created"
    );
    record_invitation_created();

    deliver_invitation_email(
        &state.email,
        &invitation.email,
        &link,
        invitation.expires_at,
        InvitationEmailKind::Initial,
    );

    Ok(Json(CreateInvitationResponse {
        ok: true,
        id: invitation.id,
        token: invitation.token,
        expires_at: invitation.expires_at,
        link,
    }))
}

/// List the invitations one inviter has sent, newest first.
///
/// GET /api/invitations?invitedBy=<uuid>
pub async fn list_invitations(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListInvitationsQuery>,
) -> Result<Json<Vec<InvitationView>>, ApiError> {
    let invited_by = query
        .invited_by
        .ok_or_else(|| ApiError::Validation("invitedBy required".to_string()))?;

    let repo = InvitationRepository::new(state.pool.clone());
    let now = state.clock.now();
    let invitations = repo
        .list_by_inviter(invited_by)
        .await?
        .into_iter()
        .map(|entity| Invitation::from(entity).view_at(now))
        .collect();

    Ok(Json(invitations))
}

/// Fetch an invitation by token, with the computed `expired` flag.
///
/// GET /api/invitations/:token
pub async fn get_invitation(
    State(state): State<AppState>,
    PathParams(token): PathParams<String>,
) -> Result<Json<InvitationView>, ApiError> {
    let repo = InvitationRepository::new(state.pool.clone());
    let invitation: Invitation = repo
        .find_by_token(&token)
        .await?
        .ok_or_else(ApiError::invitation_not_found)?
        .into();

    Ok(Json(invitation.view_at(state.clock.now())))
}

/// Ask for a new link. Notifies the inviter and every admin.
///
/// POST /api/invitations/:token/request-renewal
pub async fn request_renewal(
    State(state): State<AppState>,
    PathParams(token): PathParams<String>,
) -> Result<Json<OkResponse>, ApiError> {
    let repo = InvitationRepository::new(state.pool.clone());
    let outcome = repo
        .request_renewal(&token, state.clock.now())
        .await?
        .ok_or_else(ApiError::invitation_not_found)?;

    info!(
        invitation_id = %outcome.invitation.id,
        invited_by = %outcome.invitation.invited_by,
        notifications = outcome.notifications_created,
        "Invitation renewal requested"
    );
    record_renewal_requested(outcome.notifications_created);

    Ok(Json(OkResponse::ok()))
}

/// Reissue the token and expiry, back to `pending`.
///
/// POST /api/invitations/:id/approve-renewal
pub async fn approve_renewal(
    State(state): State<AppState>,
    PathParams(key): PathParams<String>,
) -> Result<Json<RenewalApprovedResponse>, ApiError> {
    let id = parse_invitation_id(&key)?;
    let repo = InvitationRepository::new(state.pool.clone());

    let token = repo
        .generate_unique_token(generate_invitation_token)
        .await?;
    let expires_at = expiry_for(state.clock.now());

    let invitation = repo
        .approve_renewal(id, &token, expires_at)
        .await?
        .ok_or_else(ApiError::invitation_not_found)?;

    let link = invite_link(&state.config.server.app_base_url, &invitation.token);

    info!(
        invitation_id = %invitation.id,
        expires_at = %invitation.expires_at,
        "Invitation renewal approved"
    );
    record_renewal_approved();

    deliver_invitation_email(
        &state.email,
        &invitation.email,
        &link,
        invitation.expires_at,
        InvitationEmailKind::Renewed,
    );

    Ok(Json(RenewalApprovedResponse {
        ok: true,
        token: invitation.token,
        expires_at: invitation.expires_at,
        link,
    }))
}

/// Mark an invitation accepted.
///
/// POST /api/invitations/:id/accept
pub async fn accept_invitation(
    State(state): State<AppState>,
    PathParams(key): PathParams<String>,
) -> Result<Json<OkResponse>, ApiError> {
    set_status(&state, &key, InvitationStatus::Accepted).await
}

/// Cancel an invitation.
///
/// POST /api/invitations/:id/cancel
pub async fn cancel_invitation(
    State(state): State<AppState>,
    PathParams(key): PathParams<String>,
) -> Result<Json<OkResponse>, ApiError> {
    set_status(&state, &key, InvitationStatus::Cancelled).await
}

async fn set_status(
    state: &AppState,
    key: &str,
    status: InvitationStatus,
) -> Result<Json<OkResponse>, ApiError> {
    let id = parse_invitation_id(key)?;
    let repo = InvitationRepository::new(state.pool.clone());

    let rows = repo.set_status(id, InvitationStatusDb::from(status)).await?;
    if rows == 0 {
        return Err(ApiError::invitation_not_found());
    }

    info!(invitation_id = %id, status = %status, "Invitation status changed");
    record_invitation_status_change(status.as_str());

    Ok(Json(OkResponse::ok()))
}

/// Create the invitee's account from an invitation link.
///
/// POST /api/invitations/:token/signup
///
/// The user gets the invitation's email and role. Players are also added to
/// the inviter's roster. The invitation is marked accepted in the same
/// transaction.
pub async fn signup(
    State(state): State<AppState>,
    PathParams(token): PathParams<String>,
    JsonBody(request): JsonBody<InvitationSignupRequest>,
) -> Result<Json<InvitationSignupResponse>, ApiError> {
    let password = request
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::Validation("password required".to_string()))?;
    request.validate()?;

    let repo = InvitationRepository::new(state.pool.clone());
    let invitation: Invitation = repo
        .find_by_token(&token)
        .await?
        .ok_or_else(ApiError::invitation_not_found)?
        .into();

    let now = state.clock.now();
    if invitation.is_expired_at(now) {
        return Err(ApiError::Conflict("Invitation has expired".to_string()));
    }
    if !invitation.status.is_open() {
        return Err(ApiError::Conflict(format!(
            "Invitation is {}",
            invitation.status
        )));
    }

    let role = invitation.role.parse::<UserRole>().unwrap_or_else(|_| {
        warn!(
            invitation_id = %invitation.id,
            role = %invitation.role,
            "Unknown invitation role, signing up as player"
        );
        UserRole::Player
    });

    let player_name = match role {
        UserRole::Player => Some(
            request
                .player_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or_else(|| ApiError::Validation("playerName required".to_string()))?,
        ),
        _ => None,
    };

    let email = normalize_email(&invitation.email);
    let users = UserRepository::new(state.pool.clone());
    if users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(password)?;
    let display_name = request
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let outcome = repo
        .complete_signup(
            InvitationSignup {
                invitation_id: invitation.id,
                email: &email,
                password_hash: &password_hash,
                display_name,
                role: role.into(),
                player: player_name.map(|name| (invitation.invited_by, name)),
            },
            now,
        )
        .await?;

    match outcome {
        SignupOutcome::Created { user_id, player_id } => {
            info!(
                invitation_id = %invitation.id,
                user_id = %user_id,
                player_id = ?player_id,
                role = %role,
                "Invitation signup completed"
            );
            record_invitation_status_change(InvitationStatus::Accepted.as_str());

            Ok(Json(InvitationSignupResponse {
                ok: true,
                user_id,
                player_id,
            }))
        }
        SignupOutcome::NoLongerOpen => Err(ApiError::Conflict(
            "Invitation is no longer open".to_string(),
        )),
    }
}

fn parse_invitation_id(key: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(key).map_err(|_| ApiError::invitation_not_found())
}

/// Sends the invitation email in the background; failures are only logged.
fn deliver_invitation_email(
    email: &EmailService,
    to: &str,
    link: &str,
    expires_at: DateTime<Utc>,
    kind: InvitationEmailKind,
) {
    let email = email.clone();
    let to = to.to_string();
    let link = link.to_string();

    tokio::spawn(async move {
        if let Err(e) = email
            .send_invitation_email(&to, &link, expires_at, kind)
            .await
        {
            warn!(error = %e, kind = ?kind, "Failed to send invitation email");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_invitation_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_invitation_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_invitation_id("not-a-uuid"),
            Err(ApiError::NotFound(_))
        ));
    }
}

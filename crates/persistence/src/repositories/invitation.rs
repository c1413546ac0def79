//! Invitation repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::NewNotification;
use domain::services::renewal::plan_renewal_notifications;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::entities::{InvitationEntity, InvitationStatusDb, UserRoleDb};
use crate::metrics::QueryTimer;
use crate::repositories::user::admin_ids;

/// Result of a renewal request that matched an invitation.
#[derive(Debug, Clone)]
pub struct RenewalRequestOutcome {
    pub invitation: InvitationEntity,
    pub notifications_created: usize,
}

/// Account details for completing a signup from an invitation.
#[derive(Debug, Clone)]
pub struct InvitationSignup<'a> {
    pub invitation_id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub display_name: Option<&'a str>,
    pub role: UserRoleDb,
    /// When set, a player row is created under this coach for the new user.
    pub player: Option<(Uuid, &'a str)>,
}

/// Result of a signup attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    Created {
        user_id: Uuid,
        player_id: Option<Uuid>,
    },
    /// The invitation was accepted, cancelled, renewed or expired concurrently.
    NoLongerOpen,
}

const INVITATION_COLUMNS: &str =
    "id, email, token, status, invited_by, role, created_at, expires_at";

/// Repository for invitation-related database operations.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    /// Creates a new InvitationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new invitation in `pending` status.
    pub async fn create(
        &self,
        email: &str,
        token: &str,
        role: &str,
        invited_by: Uuid,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<InvitationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invitation");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            INSERT INTO invitations (email, token, status, invited_by, role, created_at, expires_at)
            VALUES ($1, $2, 'pending', $3, $4, $5, $6)
            RETURNING {INVITATION_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(token)
        .bind(invited_by)
        .bind(role)
        .bind(created_at)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record(&result);
        result
    }

    /// Find invitation by exact token match.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invitation_by_token");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await;
        timer.record(&result);
        result
    }

    /// List invitations sent by one inviter, newest first.
    pub async fn list_by_inviter(
        &self,
        invited_by: Uuid,
    ) -> Result<Vec<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_invitations_by_inviter");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            SELECT {INVITATION_COLUMNS}
            FROM invitations
            WHERE invited_by = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(invited_by)
        .fetch_all(&self.pool)
        .await;
        timer.record(&result);
        result
    }

    /// Marks the invitation `renew_requested` and fans out notifications to
    /// the inviter and every current admin, in one transaction.
    ///
    /// Returns `None` when no invitation has this token; nothing is written then.
    pub async fn request_renewal(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RenewalRequestOutcome>, sqlx::Error> {
        let timer = QueryTimer::new("request_invitation_renewal");
        let result = self.fan_out_renewal(token, now).await;
        timer.record(&result);

        if let Ok(Some(outcome)) = &result {
            debug!(
                invitation_id = %outcome.invitation.id,
                recipients = outcome.notifications_created,
                "Renewal request fanned out"
            );
        }
        result
    }

    async fn fan_out_renewal(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RenewalRequestOutcome>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let invitation = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            UPDATE invitations
            SET status = 'renew_requested'
            WHERE token = $1
            RETURNING {INVITATION_COLUMNS}
            "#
        ))
        .bind(token)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(invitation) = invitation else {
            return Ok(None);
        };

        let admins = admin_ids(&mut *tx).await?;
        let plan = plan_renewal_notifications(
            invitation.id,
            &invitation.email,
            invitation.invited_by,
            &admins,
        );

        for notification in &plan {
            insert_notification(&mut tx, notification, now).await?;
        }

        tx.commit().await?;

        Ok(Some(RenewalRequestOutcome {
            invitation,
            notifications_created: plan.len(),
        }))
    }

    /// Reissues the token and expiry and resets status to `pending`.
    pub async fn approve_renewal(
        &self,
        id: Uuid,
        new_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("approve_invitation_renewal");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            UPDATE invitations
            SET token = $2, expires_at = $3, status = 'pending'
            WHERE id = $1
            RETURNING {INVITATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(new_token)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record(&result);
        result
    }

    /// Sets the stored status. Returns the number of rows affected.
    pub async fn set_status(&self, id: Uuid, status: InvitationStatusDb) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("set_invitation_status");
        let result = sqlx::query("UPDATE invitations SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await
            .map(|done| done.rows_affected());
        timer.record(&result);
        result
    }

    /// Check if token exists.
    pub async fn token_exists(&self, token: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_invitation_token_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM invitations WHERE token = $1)",
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await;
        timer.record(&result);
        result
    }

    /// Generate unique invitation token by retrying if collision.
    pub async fn generate_unique_token<F>(&self, generator: F) -> Result<String, sqlx::Error>
    where
        F: Fn() -> String,
    {
        let mut token = generator();
        let mut attempts = 0;

        while self.token_exists(&token).await? {
            token = generator();
            attempts += 1;
            if attempts > 10 {
                return Err(sqlx::Error::Protocol(
                    "Could not generate unique invitation token".to_string(),
                ));
            }
        }

        Ok(token)
    }

    /// Creates the invitee's account and marks the invitation accepted, atomically.
    ///
    /// The invitation must still be open and unexpired at `now` when the
    /// transaction runs.
    pub async fn complete_signup(
        &self,
        signup: InvitationSignup<'_>,
        now: DateTime<Utc>,
    ) -> Result<SignupOutcome, sqlx::Error> {
        let timer = QueryTimer::new("complete_invitation_signup");
        let result = self.claim_and_register(signup, now).await;
        timer.record(&result);
        result
    }

    async fn claim_and_register(
        &self,
        signup: InvitationSignup<'_>,
        now: DateTime<Utc>,
    ) -> Result<SignupOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query(
            r#"
            UPDATE invitations
            SET status = 'accepted'
            WHERE id = $1
              AND status IN ('pending', 'sent')
              AND expires_at >= $2
            "#,
        )
        .bind(signup.invitation_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            return Ok(SignupOutcome::NoLongerOpen);
        }

        let user_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, password_hash, display_name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id
            "#,
        )
        .bind(signup.email)
        .bind(signup.password_hash)
        .bind(signup.display_name)
        .bind(signup.role)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let player_id = match signup.player {
            Some((coach_id, player_name)) => Some(
                sqlx::query_scalar::<_, Uuid>(
                    r#"
                    INSERT INTO players (coach_id, user_id, player_name, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $4)
                    RETURNING id
                    "#,
                )
                .bind(coach_id)
                .bind(user_id)
                .bind(player_name)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?,
            ),
            None => None,
        };

        tx.commit().await?;

        Ok(SignupOutcome::Created { user_id, player_id })
    }
}

async fn insert_notification(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    notification: &NewNotification,
    created_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO notifications (type, message, recipient_user_id, related_invitation_id, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(notification.kind.as_str())
    .bind(&notification.message)
    .bind(notification.recipient_user_id)
    .bind(notification.related_invitation_id)
    .bind(created_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

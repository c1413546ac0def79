//! Notification inbox routes.

use axum::{extract::State, Json};
use domain::models::notification::ListNotificationsQuery;
use domain::models::Notification;
use persistence::repositories::NotificationRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::QueryParams;

/// List a recipient's notifications, newest first.
///
/// GET /api/notifications?recipient=<uuid>
pub async fn list_notifications(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListNotificationsQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let recipient = query
        .recipient
        .ok_or_else(|| ApiError::Validation("recipient required".to_string()))?;

    let repo = NotificationRepository::new(state.pool.clone());
    let notifications = repo
        .list_for_recipient(recipient)
        .await?
        .into_iter()
        .map(Notification::from)
        .collect();

    Ok(Json(notifications))
}

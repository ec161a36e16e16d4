//! Defines the endpoint for marking a notification as read.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{AppState, Error, auth::Claims};

use super::core::{NotificationId, mark_notification_read};

/// A route handler that marks one of the caller's notifications as read.
///
/// # Errors
/// Returns [Error::NotFound] if the notification does not exist or belongs
/// to another user.
pub async fn read_notification_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(notification_id): Path<NotificationId>,
) -> Result<Json<Value>, Error> {
    let connection = state.lock_connection()?;
    mark_notification_read(notification_id, claims.sub, &connection)?;

    Ok(Json(json!({ "message": "notification read" })))
}

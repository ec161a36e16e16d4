//! Defines the endpoint for registering a bank account.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::{AppState, Error, account::insert_account, auth::Claims};

use super::core::NewAccount;

/// A route handler that registers a new bank account for the caller.
///
/// # Errors
/// Returns [Error::Validation] if the account number is empty or too long.
pub async fn create_account_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Json(new_account): Json<NewAccount>,
) -> Result<(StatusCode, Json<Value>), Error> {
    let connection = state.lock_connection()?;
    let account = insert_account(claims.sub, new_account, &connection)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "account created", "account_id": account.id })),
    ))
}

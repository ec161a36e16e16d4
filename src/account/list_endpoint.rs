//! Defines the endpoint for listing the caller's bank accounts.

use axum::{Json, extract::State};

use crate::{AppState, Error, account::list_accounts, auth::Claims};

use super::core::AccountResponse;

/// A route handler that returns all of the caller's accounts, oldest first.
pub async fn list_accounts_endpoint(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<AccountResponse>>, Error> {
    let connection = state.lock_connection()?;
    let accounts = list_accounts(claims.sub, &connection)?;

    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

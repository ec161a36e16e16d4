//! Defines the endpoint for reading a single bank account.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{AppState, Error, account::get_account, auth::Claims};

use super::core::{AccountId, AccountResponse};

/// A route handler that returns one of the caller's accounts.
///
/// The row is served from [crate::ReadCache] when possible; a cached row
/// that belongs to a different user is treated as not found rather than
/// leaked.
///
/// # Errors
/// Returns [Error::NotFound] if the account does not exist or belongs to
/// another user.
pub async fn get_account_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(account_id): Path<AccountId>,
) -> Result<Json<AccountResponse>, Error> {
    if let Some(account) = state.cache.get_account(account_id) {
        if account.user_id != claims.sub {
            return Err(Error::NotFound);
        }

        return Ok(Json(account.into()));
    }

    let account = {
        let connection = state.lock_connection()?;
        get_account(account_id, claims.sub, &connection)?
    };

    state.cache.put_account(account.clone());

    Ok(Json(account.into()))
}

//! Defines the endpoint for applying a transaction to an account.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{AppState, Error, account::AccountId, auth::Claims};

use super::{core::NewTransaction, ledger::apply_transaction};

/// A route handler that applies a deposit or withdrawal to one of the
/// caller's accounts.
///
/// The account's cached read view is dropped before the response is sent,
/// so a read that follows a committed transaction always observes the new
/// balance. The ledger event only drives notifications.
///
/// # Errors
/// Returns [Error::Validation] for a bad amount or overlong details,
/// [Error::NotFound] if the account does not exist or belongs to another
/// user, and [Error::InsufficientFunds] if a withdrawal exceeds the balance.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(account_id): Path<AccountId>,
    Json(new_transaction): Json<NewTransaction>,
) -> Result<(StatusCode, Json<Value>), Error> {
    let record = {
        let mut connection = state.lock_connection()?;
        apply_transaction(
            &mut connection,
            claims.sub,
            account_id,
            &new_transaction,
            &state.events,
        )?
    };

    state.cache.invalidate_account(account_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "transaction applied",
            "transaction_id": record.id,
            "post_transaction_amount": record.post_transaction_amount,
        })),
    ))
}

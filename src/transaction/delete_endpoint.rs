//! Defines the endpoint for deleting a transaction from the history.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{AppState, Error, account::AccountId, auth::Claims};

use super::core::{TransactionId, delete_transaction};

/// A route handler that removes a transaction from the history.
///
/// The account balance is not adjusted: the row is a record of something
/// that happened, deleting it does not undo the deposit or withdrawal.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction or account is missing or not
/// owned by the caller.
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path((account_id, transaction_id)): Path<(AccountId, TransactionId)>,
) -> Result<Json<Value>, Error> {
    let connection = state.lock_connection()?;
    delete_transaction(account_id, transaction_id, claims.sub, &connection)?;

    Ok(Json(json!({ "message": "transaction deleted" })))
}

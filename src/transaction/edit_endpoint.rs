//! Defines the endpoint for editing the descriptive fields of a transaction.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{AppState, Error, account::AccountId, auth::Claims};

use super::core::{TransactionId, TransactionRecord, TransactionUpdate, update_transaction};

/// A route handler that edits the details, method or timestamp of a
/// transaction. The amount and type cannot be changed because the history
/// must stay consistent with the balance it produced.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction or account is missing or not
/// owned by the caller, and [Error::Validation] if the new details exceed
/// 255 characters.
pub async fn edit_transaction_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path((account_id, transaction_id)): Path<(AccountId, TransactionId)>,
    Json(update): Json<TransactionUpdate>,
) -> Result<Json<TransactionRecord>, Error> {
    let connection = state.lock_connection()?;
    let record = update_transaction(account_id, transaction_id, claims.sub, &update, &connection)?;

    Ok(Json(record))
}

//! The balance ledger: applies transactions to account balances.
//!
//! A transaction is committed atomically with its balance change inside a
//! single SQLite transaction. The balance adjustment is a conditional
//! UPDATE, so a concurrent withdrawal can never drive a balance below zero
//! and concurrent deposits never lose an update: whichever writer commits
//! second re-applies its delta to the balance the first writer left behind.

use chrono::Utc;
use rusqlite::{Connection, TransactionBehavior, params};

use crate::{
    Error,
    account::AccountId,
    events::{EventSender, LedgerEvent},
    money::{from_minor_units, to_minor_units},
    user::UserId,
};

use super::core::{NewTransaction, TransactionRecord, TransactionType};

/// How many times a transaction is retried when the database reports a
/// transient failure such as a busy lock.
const MAX_TRANSIENT_RETRIES: u32 = 3;

/// Apply a deposit or withdrawal to an account owned by `user_id`.
///
/// The history row and the balance change commit together or not at all.
/// After a successful commit a [LedgerEvent::BalanceChanged] is published on
/// `events`; delivery is best-effort and never fails the request.
///
/// Transient store failures are retried up to [MAX_TRANSIENT_RETRIES] times
/// before [Error::TransientStore] is returned to the caller.
///
/// # Errors
/// - [Error::Validation] if the amount is not positive, has more than two
///   decimal places, or the details exceed 255 characters.
/// - [Error::NotFound] if the account does not exist or belongs to another
///   user.
/// - [Error::InsufficientFunds] if a withdrawal exceeds the balance.
pub fn apply_transaction(
    connection: &mut Connection,
    user_id: UserId,
    account_id: AccountId,
    input: &NewTransaction,
    events: &EventSender,
) -> Result<TransactionRecord, Error> {
    if input.transaction_amount.is_sign_negative() || input.transaction_amount.is_zero() {
        return Err(Error::Validation(
            "transaction amount must be positive".to_owned(),
        ));
    }

    let amount_units = to_minor_units(input.transaction_amount)?;

    let mut attempts = 0;
    let (record, account_number) = loop {
        match apply_once(connection, user_id, account_id, input, amount_units) {
            Err(Error::TransientStore) if attempts < MAX_TRANSIENT_RETRIES => {
                attempts += 1;
                tracing::warn!(
                    "transient store failure applying a transaction to account \
                     {account_id}, retry {attempts} of {MAX_TRANSIENT_RETRIES}"
                );
            }
            other => break other?,
        }
    };

    let event = LedgerEvent::BalanceChanged {
        user_id,
        account_id,
        account_number,
        kind: input.transaction_type,
        amount: record.transaction_amount,
    };

    if events.send(event).is_err() {
        tracing::debug!("no consumer for ledger events, skipping invalidation");
    }

    Ok(record)
}

fn apply_once(
    connection: &mut Connection,
    user_id: UserId,
    account_id: AccountId,
    input: &NewTransaction,
    amount_units: i64,
) -> Result<(TransactionRecord, String), Error> {
    let now = Utc::now();
    let transaction_timestamp = input.transaction_timestamp.unwrap_or(now);

    // Taking the write lock up front avoids a deadlock-prone lock upgrade
    // between the ownership read and the balance write.
    let tx = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let account_number: String = tx.query_row(
        "SELECT account_number FROM accounts WHERE id = ?1 AND user_id = ?2",
        params![account_id, user_id],
        |row| row.get(0),
    )?;

    let rows_updated = match input.transaction_type {
        TransactionType::Deposit => tx.execute(
            "UPDATE accounts SET balance = balance + ?1, updated_at = ?2 WHERE id = ?3",
            params![amount_units, now, account_id],
        )?,
        TransactionType::Withdraw => tx.execute(
            "UPDATE accounts SET balance = balance - ?1, updated_at = ?2
             WHERE id = ?3 AND balance >= ?1",
            params![amount_units, now, account_id],
        )?,
    };

    if rows_updated == 0 {
        return Err(Error::InsufficientFunds);
    }

    let post_units: i64 = tx.query_row(
        "SELECT balance FROM accounts WHERE id = ?1",
        [account_id],
        |row| row.get(0),
    )?;

    tx.execute(
        "INSERT INTO transaction_history (account_id, transaction_amount, \
         post_transaction_amount, transaction_details, transaction_type, transaction_method, \
         transaction_timestamp, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        params![
            account_id,
            amount_units,
            post_units,
            input.transaction_details,
            input.transaction_type,
            input.transaction_method,
            transaction_timestamp,
            now,
        ],
    )?;

    let id = tx.last_insert_rowid();

    tx.commit()?;

    let record = TransactionRecord {
        id,
        account_id,
        transaction_amount: from_minor_units(amount_units),
        post_transaction_amount: from_minor_units(post_units),
        transaction_details: input.transaction_details.clone(),
        transaction_type: input.transaction_type,
        transaction_method: input.transaction_method,
        transaction_timestamp,
        created_at: now,
        updated_at: now,
    };

    Ok((record, account_number))
}

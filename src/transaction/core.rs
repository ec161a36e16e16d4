//! Defines the transaction history model and its database queries.
//!
//! Everything here treats the history as an append-only record of committed
//! balance changes: rows are only created by the ledger in
//! [crate::transaction::apply_transaction], and edits are limited to the
//! descriptive fields that do not affect balances.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{
    Connection, Row, ToSql, params, params_from_iter,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    account::AccountId,
    money::{from_minor_units, to_minor_units},
    pagination::{PageParams, Paginated},
    user::UserId,
};

/// The database ID of a transaction history row.
pub type TransactionId = i64;

/// Whether a transaction added to or removed from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money was added to the account.
    Deposit,
    /// Money was removed from the account.
    Withdraw,
}

impl TransactionType {
    /// The human readable name, as used in notification messages.
    pub fn display_name(self) -> &'static str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdraw => "Withdrawal",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdraw => "WITHDRAW",
        }
    }

    fn from_str(text: &str) -> Option<Self> {
        match text {
            "DEPOSIT" => Some(TransactionType::Deposit),
            "WITHDRAW" => Some(TransactionType::Withdraw),
            _ => None,
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        TransactionType::from_str(text).ok_or(FromSqlError::InvalidType)
    }
}

/// How a transaction was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionMethod {
    /// A cash machine.
    Atm,
    /// Online banking.
    Online,
    /// A bank transfer.
    Transfer,
    /// A card payment.
    Card,
}

impl TransactionMethod {
    /// The human readable name of the method.
    pub fn display_name(self) -> &'static str {
        match self {
            TransactionMethod::Atm => "ATM",
            TransactionMethod::Online => "Online banking",
            TransactionMethod::Transfer => "Bank transfer",
            TransactionMethod::Card => "Card",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            TransactionMethod::Atm => "ATM",
            TransactionMethod::Online => "ONLINE",
            TransactionMethod::Transfer => "TRANSFER",
            TransactionMethod::Card => "CARD",
        }
    }

    fn from_str(text: &str) -> Option<Self> {
        match text {
            "ATM" => Some(TransactionMethod::Atm),
            "ONLINE" => Some(TransactionMethod::Online),
            "TRANSFER" => Some(TransactionMethod::Transfer),
            "CARD" => Some(TransactionMethod::Card),
            _ => None,
        }
    }
}

impl ToSql for TransactionMethod {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionMethod {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        TransactionMethod::from_str(text).ok_or(FromSqlError::InvalidType)
    }
}

/// A committed transaction, including the balance it left behind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The account the transaction was applied to.
    pub account_id: AccountId,
    /// The amount that was deposited or withdrawn, always positive.
    pub transaction_amount: Decimal,
    /// The account balance immediately after this transaction.
    pub post_transaction_amount: Decimal,
    /// A free-form description, at most 255 characters.
    pub transaction_details: String,
    /// Whether money was deposited or withdrawn.
    pub transaction_type: TransactionType,
    /// How the transaction was carried out.
    pub transaction_method: TransactionMethod,
    /// When the transaction took place.
    pub transaction_timestamp: DateTime<Utc>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last edited.
    pub updated_at: DateTime<Utc>,
}

/// The data for applying a new transaction to an account.
#[derive(Debug, Deserialize)]
pub struct NewTransaction {
    /// The amount to deposit or withdraw, must be positive.
    pub transaction_amount: Decimal,
    /// A free-form description, at most 255 characters.
    #[serde(default)]
    pub transaction_details: String,
    /// Whether to deposit or withdraw.
    pub transaction_type: TransactionType,
    /// How the transaction was carried out.
    pub transaction_method: TransactionMethod,
    /// When the transaction took place. Defaults to the current time.
    #[serde(default)]
    pub transaction_timestamp: Option<DateTime<Utc>>,
}

/// The editable fields of a transaction. `None` fields are left unchanged.
///
/// The amount and type are deliberately not editable: changing them would
/// desynchronize the history from the balance it produced.
#[derive(Debug, Deserialize)]
pub struct TransactionUpdate {
    /// A new description.
    pub transaction_details: Option<String>,
    /// A new method.
    pub transaction_method: Option<TransactionMethod>,
    /// A new timestamp.
    pub transaction_timestamp: Option<DateTime<Utc>>,
}

/// The filters for listing transactions. All filters are optional and
/// combine with AND.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionFilter {
    /// Keep only deposits or only withdrawals.
    pub transaction_type: Option<TransactionType>,
    /// Keep transactions of at least this amount.
    pub min_amount: Option<Decimal>,
    /// Keep transactions of at most this amount.
    pub max_amount: Option<Decimal>,
    /// Keep transactions on or after this date (UTC).
    pub start_date: Option<NaiveDate>,
    /// Keep transactions on or before this date (UTC).
    pub end_date: Option<NaiveDate>,
    /// The 1-based page number.
    pub page: Option<u64>,
    /// The number of rows per page, at most
    /// [crate::pagination::MAX_PAGE_SIZE].
    pub page_size: Option<u64>,
}

/// Create the transaction history table in the database.
///
/// The amount guard and the details length limit live in the table
/// definition so that a row violating them can never be committed, no matter
/// which code path inserts it.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_transaction_history_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transaction_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
            transaction_amount INTEGER NOT NULL CHECK (transaction_amount > 0),
            post_transaction_amount INTEGER NOT NULL,
            transaction_details TEXT NOT NULL DEFAULT ''
                CONSTRAINT transaction_details_length CHECK (length(transaction_details) <= 255),
            transaction_type TEXT NOT NULL,
            transaction_method TEXT NOT NULL,
            transaction_timestamp TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
            )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_history_account_timestamp
         ON transaction_history(account_id, transaction_timestamp)",
        (),
    )?;

    Ok(())
}

const TRANSACTION_COLUMNS: &str = "id, account_id, transaction_amount, post_transaction_amount, \
     transaction_details, transaction_type, transaction_method, transaction_timestamp, \
     created_at, updated_at";

/// Retrieve a single transaction on an account owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction does not exist, belongs to a
/// different account, or the account belongs to another user.
pub fn get_transaction(
    account_id: AccountId,
    transaction_id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<TransactionRecord, Error> {
    let record = connection.query_row(
        &format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transaction_history
             WHERE id = ?1 AND account_id = ?2
               AND account_id IN (SELECT id FROM accounts WHERE id = ?2 AND user_id = ?3)"
        ),
        params![transaction_id, account_id, user_id],
        map_transaction_row,
    )?;

    Ok(record)
}

/// Retrieve a page of transactions on an account owned by `user_id`, newest
/// first.
///
/// # Errors
/// Returns [Error::NotFound] if the account does not exist or belongs to
/// another user, and [Error::Validation] if an amount filter has more than
/// two decimal places.
pub fn list_transactions(
    account_id: AccountId,
    user_id: UserId,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Paginated<TransactionRecord>, Error> {
    let owned: bool = connection.query_row(
        "SELECT EXISTS (SELECT 1 FROM accounts WHERE id = ?1 AND user_id = ?2)",
        params![account_id, user_id],
        |row| row.get(0),
    )?;

    if !owned {
        return Err(Error::NotFound);
    }

    let mut conditions = vec!["account_id = ?".to_owned()];
    let mut values: Vec<Box<dyn ToSql>> = vec![Box::new(account_id)];

    if let Some(transaction_type) = filter.transaction_type {
        conditions.push("transaction_type = ?".to_owned());
        values.push(Box::new(transaction_type));
    }

    if let Some(min_amount) = filter.min_amount {
        conditions.push("transaction_amount >= ?".to_owned());
        values.push(Box::new(to_minor_units(min_amount)?));
    }

    if let Some(max_amount) = filter.max_amount {
        conditions.push("transaction_amount <= ?".to_owned());
        values.push(Box::new(to_minor_units(max_amount)?));
    }

    if let Some(start_date) = filter.start_date {
        conditions.push("transaction_timestamp >= ?".to_owned());
        values.push(Box::new(start_of_day(start_date)));
    }

    if let Some(end_date) = filter.end_date {
        conditions.push("transaction_timestamp < ?".to_owned());
        values.push(Box::new(start_of_day(end_date + chrono::Days::new(1))));
    }

    let where_clause = conditions.join(" AND ");

    // SQLite reports COUNT as a signed integer.
    let count: i64 = connection.query_row(
        &format!("SELECT COUNT(id) FROM transaction_history WHERE {where_clause}"),
        params_from_iter(values.iter().map(|value| value.as_ref())),
        |row| row.get(0),
    )?;

    let params = PageParams::resolve(filter.page, filter.page_size);

    let results = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transaction_history
             WHERE {where_clause}
             ORDER BY transaction_timestamp DESC, id DESC
             LIMIT {} OFFSET {}",
            params.page_size,
            params.offset(),
        ))?
        .query_map(
            params_from_iter(values.iter().map(|value| value.as_ref())),
            map_transaction_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Paginated {
        count: count as u64,
        page: params.page,
        page_size: params.page_size,
        results,
    })
}

/// Update the descriptive fields of a transaction on an account owned by
/// `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction or account is missing or not
/// owned, and [Error::Validation] if the new details exceed 255 characters.
pub fn update_transaction(
    account_id: AccountId,
    transaction_id: TransactionId,
    user_id: UserId,
    update: &TransactionUpdate,
    connection: &Connection,
) -> Result<TransactionRecord, Error> {
    let rows_updated = connection.execute(
        "UPDATE transaction_history SET
            transaction_details = COALESCE(?1, transaction_details),
            transaction_method = COALESCE(?2, transaction_method),
            transaction_timestamp = COALESCE(?3, transaction_timestamp),
            updated_at = ?4
         WHERE id = ?5 AND account_id = ?6
           AND account_id IN (SELECT id FROM accounts WHERE id = ?6 AND user_id = ?7)",
        params![
            update.transaction_details,
            update.transaction_method,
            update.transaction_timestamp,
            Utc::now(),
            transaction_id,
            account_id,
            user_id,
        ],
    )?;

    if rows_updated == 0 {
        return Err(Error::NotFound);
    }

    get_transaction(account_id, transaction_id, user_id, connection)
}

/// Delete a transaction on an account owned by `user_id`.
///
/// Deleting a row removes it from the history only, the account balance is
/// left as it is.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction or account is missing or not
/// owned.
pub fn delete_transaction(
    account_id: AccountId,
    transaction_id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_deleted = connection.execute(
        "DELETE FROM transaction_history
         WHERE id = ?1 AND account_id = ?2
           AND account_id IN (SELECT id FROM accounts WHERE id = ?2 AND user_id = ?3)",
        params![transaction_id, account_id, user_id],
    )?;

    if rows_deleted == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Map a database row to a [TransactionRecord], converting the stored
/// hundredths back into [Decimal]s.
pub(super) fn map_transaction_row(row: &Row) -> Result<TransactionRecord, rusqlite::Error> {
    let amount_units: i64 = row.get(2)?;
    let post_units: i64 = row.get(3)?;

    Ok(TransactionRecord {
        id: row.get(0)?,
        account_id: row.get(1)?,
        transaction_amount: from_minor_units(amount_units),
        post_transaction_amount: from_minor_units(post_units),
        transaction_details: row.get(4)?,
        transaction_type: row.get(5)?,
        transaction_method: row.get(6)?,
        transaction_timestamp: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

//! Defines the bank account model and its database queries.
//!
//! Balances are stored as integer hundredths so that the ledger can adjust
//! them with exact integer arithmetic inside SQL. The conversion to
//! [Decimal] happens only when rows are mapped back out.

use chrono::{DateTime, Utc};
use rusqlite::{
    Connection, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    money::from_minor_units,
    user::UserId,
};

/// The database ID of a bank account.
pub type AccountId = i64;

/// The bank holding an account, stored as the bank's three digit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BankCode {
    /// A bank without a known code.
    #[serde(rename = "000")]
    Unknown,
    /// Korea Development Bank.
    #[serde(rename = "002")]
    Kdb,
    /// Industrial Bank of Korea.
    #[serde(rename = "003")]
    Ibk,
    /// KB Kookmin Bank.
    #[serde(rename = "004")]
    KbKookmin,
    /// Nonghyup Bank.
    #[serde(rename = "011")]
    Nonghyup,
    /// Woori Bank.
    #[serde(rename = "020")]
    Woori,
    /// Hana Bank.
    #[serde(rename = "081")]
    Hana,
    /// Shinhan Bank.
    #[serde(rename = "088")]
    Shinhan,
    /// Kakao Bank.
    #[serde(rename = "090")]
    KakaoBank,
    /// Toss Bank.
    #[serde(rename = "092")]
    TossBank,
}

impl BankCode {
    /// The three digit code the bank is stored and serialized as.
    pub fn code(self) -> &'static str {
        match self {
            BankCode::Unknown => "000",
            BankCode::Kdb => "002",
            BankCode::Ibk => "003",
            BankCode::KbKookmin => "004",
            BankCode::Nonghyup => "011",
            BankCode::Woori => "020",
            BankCode::Hana => "081",
            BankCode::Shinhan => "088",
            BankCode::KakaoBank => "090",
            BankCode::TossBank => "092",
        }
    }

    /// The human readable bank name.
    pub fn display_name(self) -> &'static str {
        match self {
            BankCode::Unknown => "Unknown",
            BankCode::Kdb => "KDB Bank",
            BankCode::Ibk => "IBK Bank",
            BankCode::KbKookmin => "KB Kookmin Bank",
            BankCode::Nonghyup => "Nonghyup Bank",
            BankCode::Woori => "Woori Bank",
            BankCode::Hana => "Hana Bank",
            BankCode::Shinhan => "Shinhan Bank",
            BankCode::KakaoBank => "Kakao Bank",
            BankCode::TossBank => "Toss Bank",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "000" => Some(BankCode::Unknown),
            "002" => Some(BankCode::Kdb),
            "003" => Some(BankCode::Ibk),
            "004" => Some(BankCode::KbKookmin),
            "011" => Some(BankCode::Nonghyup),
            "020" => Some(BankCode::Woori),
            "081" => Some(BankCode::Hana),
            "088" => Some(BankCode::Shinhan),
            "090" => Some(BankCode::KakaoBank),
            "092" => Some(BankCode::TossBank),
            _ => None,
        }
    }
}

impl ToSql for BankCode {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for BankCode {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = value.as_str()?;
        BankCode::from_code(code).ok_or(FromSqlError::InvalidType)
    }
}

/// The product type of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// An everyday checking account.
    Checking,
    /// A savings account.
    Savings,
    /// A fixed term deposit.
    FixedDeposit,
    /// An installment savings plan.
    InstallmentSavings,
}

impl AccountType {
    /// The human readable name of the product type.
    pub fn display_name(self) -> &'static str {
        match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
            AccountType::FixedDeposit => "Fixed deposit",
            AccountType::InstallmentSavings => "Installment savings",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            AccountType::Checking => "CHECKING",
            AccountType::Savings => "SAVINGS",
            AccountType::FixedDeposit => "FIXED_DEPOSIT",
            AccountType::InstallmentSavings => "INSTALLMENT_SAVINGS",
        }
    }

    fn from_str(text: &str) -> Option<Self> {
        match text {
            "CHECKING" => Some(AccountType::Checking),
            "SAVINGS" => Some(AccountType::Savings),
            "FIXED_DEPOSIT" => Some(AccountType::FixedDeposit),
            "INSTALLMENT_SAVINGS" => Some(AccountType::InstallmentSavings),
            _ => None,
        }
    }
}

impl ToSql for AccountType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AccountType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        AccountType::from_str(text).ok_or(FromSqlError::InvalidType)
    }
}

/// A bank account belonging to a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    /// The ID of the account.
    pub id: AccountId,
    /// The ID of the owning user.
    pub user_id: UserId,
    /// The account number at the bank.
    pub account_number: String,
    /// The bank holding the account.
    pub bank_code: BankCode,
    /// The product type of the account.
    pub account_type: AccountType,
    /// The current balance.
    pub balance: Decimal,
    /// When the account was registered.
    pub created_at: DateTime<Utc>,
    /// When the account was last changed.
    pub updated_at: DateTime<Utc>,
}

/// The data for registering a new account. New accounts start with a zero
/// balance.
#[derive(Debug, Deserialize)]
pub struct NewAccount {
    /// The account number at the bank.
    pub account_number: String,
    /// The bank holding the account.
    pub bank_code: BankCode,
    /// The product type of the account.
    pub account_type: AccountType,
}

/// An account as presented by the read endpoints, with the bank and product
/// names spelled out.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// The ID of the account.
    pub id: AccountId,
    /// The account number at the bank.
    pub account_number: String,
    /// The bank's three digit code.
    pub bank_code: BankCode,
    /// The human readable bank name.
    pub bank_name: &'static str,
    /// The product type of the account.
    pub account_type: AccountType,
    /// The human readable product name.
    pub account_type_name: &'static str,
    /// The current balance.
    pub balance: Decimal,
    /// When the account was registered.
    pub created_at: DateTime<Utc>,
    /// When the account was last changed.
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            account_number: account.account_number,
            bank_code: account.bank_code,
            bank_name: account.bank_code.display_name(),
            account_type: account.account_type,
            account_type_name: account.account_type.display_name(),
            balance: account.balance,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Create the accounts table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS accounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            account_number TEXT NOT NULL,
            bank_code TEXT NOT NULL,
            account_type TEXT NOT NULL,
            balance INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
            )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_accounts_user ON accounts(user_id)",
        (),
    )?;

    Ok(())
}

const MAX_ACCOUNT_NUMBER_LENGTH: usize = 30;

/// Register a new account with a zero balance.
///
/// # Errors
/// Returns [Error::Validation] if the account number is empty or too long.
pub fn insert_account(
    user_id: UserId,
    new_account: NewAccount,
    connection: &Connection,
) -> Result<Account, Error> {
    if new_account.account_number.is_empty() {
        return Err(Error::Validation("account number must not be empty".to_owned()));
    }

    if new_account.account_number.len() > MAX_ACCOUNT_NUMBER_LENGTH {
        return Err(Error::Validation(format!(
            "account number must be at most {MAX_ACCOUNT_NUMBER_LENGTH} characters"
        )));
    }

    let now = Utc::now();

    connection.execute(
        "INSERT INTO accounts (user_id, account_number, bank_code, account_type, balance, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
        params![
            user_id,
            new_account.account_number,
            new_account.bank_code,
            new_account.account_type,
            now,
        ],
    )?;

    Ok(Account {
        id: connection.last_insert_rowid(),
        user_id,
        account_number: new_account.account_number,
        bank_code: new_account.bank_code,
        account_type: new_account.account_type,
        balance: Decimal::ZERO,
        created_at: now,
        updated_at: now,
    })
}

const ACCOUNT_COLUMNS: &str =
    "id, user_id, account_number, bank_code, account_type, balance, created_at, updated_at";

/// Retrieve an account owned by `user_id`.
///
/// The owner check is part of the query so an account belonging to someone
/// else is indistinguishable from a missing one.
///
/// # Errors
/// Returns [Error::NotFound] if the account does not exist or belongs to
/// another user.
pub fn get_account(
    account_id: AccountId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Account, Error> {
    let account = connection.query_row(
        &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1 AND user_id = ?2"),
        params![account_id, user_id],
        map_account_row,
    )?;

    Ok(account)
}

/// Retrieve all accounts owned by `user_id`, oldest first.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn list_accounts(user_id: UserId, connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE user_id = ?1 ORDER BY id ASC"
        ))?
        .query_map([user_id], map_account_row)?
        .map(|result| result.map_err(Error::from))
        .collect()
}

/// Delete an account owned by `user_id` and, via the foreign key cascade,
/// its transaction history.
///
/// # Errors
/// Returns [Error::NotFound] if the account does not exist or belongs to
/// another user.
pub fn delete_account(
    account_id: AccountId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_deleted = connection.execute(
        "DELETE FROM accounts WHERE id = ?1 AND user_id = ?2",
        params![account_id, user_id],
    )?;

    if rows_deleted == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Map a database row to an [Account], converting the stored hundredths back
/// into a [Decimal].
fn map_account_row(row: &Row) -> Result<Account, rusqlite::Error> {
    let balance_units: i64 = row.get(5)?;

    Ok(Account {
        id: row.get(0)?,
        user_id: row.get(1)?,
        account_number: row.get(2)?,
        bank_code: row.get(3)?,
        account_type: row.get(4)?,
        balance: from_minor_units(balance_units),
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

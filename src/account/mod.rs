//! Bank accounts: the model, queries and the CRUD endpoints.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod get_endpoint;
mod list_endpoint;

pub use core::{
    Account, AccountId, AccountResponse, AccountType, BankCode, NewAccount, create_account_table,
    delete_account, get_account, insert_account, list_accounts,
};
pub use create_endpoint::create_account_endpoint;
pub use delete_endpoint::delete_account_endpoint;
pub use get_endpoint::get_account_endpoint;
pub use list_endpoint::list_accounts_endpoint;

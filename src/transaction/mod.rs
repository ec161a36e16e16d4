//! Transaction history: the model, queries, the balance ledger and the
//! endpoints.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod ledger;
mod list_endpoint;

pub use core::{
    NewTransaction, TransactionFilter, TransactionId, TransactionMethod, TransactionRecord,
    TransactionType, TransactionUpdate, create_transaction_history_table, delete_transaction,
    get_transaction, list_transactions, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use ledger::apply_transaction;
pub use list_endpoint::list_transactions_endpoint;

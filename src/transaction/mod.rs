//! Transactions recorded against an account.

mod core;
mod create_endpoint;
mod delete_endpoint;

#[cfg(test)]
pub use core::get_transaction;
pub use core::{
    Transaction, TransactionId, create_transaction_table, delete_transaction,
    get_transactions_for_account, upsert_transaction,
};
pub use create_endpoint::{TransactionForm, create_transaction_endpoint};
pub use delete_endpoint::delete_transaction_endpoint;

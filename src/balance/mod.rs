//! Account balances: the value of an account on a given day.

mod core;
mod create_endpoint;
mod delete_endpoint;

#[cfg(test)]
pub use core::get_balance;
pub use core::{
    Balance, BalanceId, create_balance_table, delete_balance, get_balances_for_account,
    get_earliest_balance_date, get_latest_balances, upsert_balance,
};
pub use create_endpoint::{BalanceForm, create_balance_endpoint};
pub use delete_endpoint::delete_balance_endpoint;

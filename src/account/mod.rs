//! Accounts, the holdings whose balances make up the household's net worth.

mod accounts_page;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod detail_page;
mod edit_endpoint;
mod edit_page;
mod filters;
mod form;
mod form_options;

pub use accounts_page::get_accounts_page;
pub use core::{
    Account, AccountId, AccountName, AccountType, NewAccount, create_account,
    create_account_table, delete_account, get_account, get_account_id_by_legacy_id,
    get_all_accounts, update_account, upsert_account,
};
pub use create_endpoint::create_account_endpoint;
pub use create_page::get_new_account_page;
pub use delete_endpoint::delete_account_endpoint;
pub use detail_page::get_account_page;
pub use edit_endpoint::update_account_endpoint;
pub use edit_page::get_edit_account_page;
pub use form_options::{owner_label, owner_type_from_label};

//! Importing accounts, balances and transactions from CSV files.

mod alert;
mod csv;
mod import;
mod import_endpoint;
mod import_page;

pub use import::{ImportSummary, import_files};
pub use import_endpoint::import_csv_endpoint;
pub use import_page::get_import_page;

//! Creates the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, account::create_account_table, balance::create_balance_table,
    category::create_category_table, profile::create_profile_table,
    snapshot::create_snapshot_tables, transaction::create_transaction_table,
};

/// Create the tables for all of the domain models if they do not exist.
///
/// Foreign key enforcement is enabled on `connection`, so this function should
/// be called on every connection the application opens.
///
/// # Errors
/// Returns an error if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Must be set outside of a transaction, SQLite ignores it otherwise.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_profile_table(&transaction)?;
    create_account_table(&transaction)?;
    create_balance_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_snapshot_tables(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Run `operation` inside a SQL transaction, committing if it succeeds.
///
/// If `connection` is already inside a transaction, `operation` joins it and
/// the outer transaction decides whether the changes are committed.
pub fn with_transaction<T>(
    connection: &Connection,
    operation: impl FnOnce(&Connection) -> Result<T, Error>,
) -> Result<T, Error> {
    if !connection.is_autocommit() {
        return operation(connection);
    }

    // Using unchecked_transaction because we only have &Connection from the MutexGuard.
    let transaction = connection.unchecked_transaction()?;
    let result = operation(&*transaction)?;
    transaction.commit()?;

    Ok(result)
}

//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row, params};
use time::Date;

use crate::{Error, account::AccountId, database_id::DatabaseId};

pub type TransactionId = DatabaseId;

/// Money moving into or out of an account.
///
/// Transactions are kept as a record alongside the balances and do not
/// change an account's balance or the snapshots.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the transaction in the data it was imported from, if any.
    pub legacy_id: Option<String>,
    /// The account the transaction belongs to.
    pub account_id: AccountId,
    /// When the transaction happened.
    pub date: Date,
    /// Positive for money coming in, negative for money going out.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(account_id: AccountId, date: Date, amount: f64) -> NewTransaction {
        NewTransaction {
            legacy_id: None,
            account_id,
            date,
            amount,
            description: String::new(),
        }
    }
}

/// A transaction that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub legacy_id: Option<String>,
    pub account_id: AccountId,
    pub date: Date,
    pub amount: f64,
    pub description: String,
}

impl NewTransaction {
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.trim().to_owned();
        self
    }

    /// A blank ID is ignored.
    pub fn legacy_id(mut self, legacy_id: &str) -> Self {
        let legacy_id = legacy_id.trim();
        self.legacy_id = (!legacy_id.is_empty()).then(|| legacy_id.to_owned());
        self
    }
}

/// SQLite's extended result code for a failed FOREIGN KEY constraint.
const SQLITE_CONSTRAINT_FOREIGNKEY: i32 = 787;

fn map_foreign_key_violation(error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(error, Some(_))
            if error.extended_code == SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            Error::InvalidAccount
        }
        error => error.into(),
    }
}

/// Save a transaction, or update the transaction with the same legacy ID.
///
/// Returns the saved transaction with its ID.
///
/// # Errors
///
/// Returns [Error::InvalidAccount] if the account does not exist.
pub fn upsert_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let id = connection
        .query_row(
            "INSERT INTO \"transaction\" (legacy_id, account_id, date, amount, description)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(legacy_id) DO UPDATE SET
                account_id = excluded.account_id,
                date = excluded.date,
                amount = excluded.amount,
                description = excluded.description
            RETURNING id;",
            params![
                transaction.legacy_id,
                transaction.account_id,
                transaction.date,
                transaction.amount,
                transaction.description,
            ],
            |row| row.get(0),
        )
        .map_err(map_foreign_key_violation)?;

    Ok(Transaction {
        id,
        legacy_id: transaction.legacy_id,
        account_id: transaction.account_id,
        date: transaction.date,
        amount: transaction.amount,
        description: transaction.description,
    })
}

#[cfg(test)]
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .query_row(
            "SELECT id, legacy_id, account_id, date, amount, description
            FROM \"transaction\" WHERE id = ?1",
            [id],
            map_row_to_transaction,
        )
        .map_err(Error::from)
}

/// The transactions of an account, most recent first.
pub fn get_transactions_for_account(
    account_id: AccountId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, legacy_id, account_id, date, amount, description
            FROM \"transaction\"
            WHERE account_id = ?1
            ORDER BY date DESC, id DESC",
        )?
        .query_map([account_id], map_row_to_transaction)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Delete a transaction.
///
/// # Errors
///
/// Returns [Error::DeleteMissingTransaction] if there is no transaction with `id`.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            legacy_id TEXT UNIQUE,
            account_id INTEGER NOT NULL REFERENCES account(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            amount REAL NOT NULL,
            description TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_account_date
            ON \"transaction\"(account_id, date);",
    )?;

    Ok(())
}

pub fn map_row_to_transaction(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        legacy_id: row.get(1)?,
        account_id: row.get(2)?,
        date: row.get(3)?,
        amount: row.get(4)?,
        description: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        account::{Account, NewAccount, create_account, delete_account},
        category::{CategoryName, get_or_create_category},
        profile::OwnerType,
        test_utils::get_test_connection,
    };

    use super::{
        Transaction, delete_transaction, get_transaction, get_transactions_for_account,
        upsert_transaction,
    };

    fn create_test_account(name: &str, connection: &Connection) -> Account {
        let category =
            get_or_create_category(CategoryName::new_unchecked("Checking"), connection).unwrap();

        create_account(
            NewAccount::new(name, "", &category, OwnerType::Me).unwrap(),
            connection,
        )
        .unwrap()
    }

    #[test]
    fn create_then_get_transaction() {
        let connection = get_test_connection();
        let account = create_test_account("Everyday", &connection);

        let transaction = upsert_transaction(
            Transaction::build(account.id, date!(2024 - 01 - 05), -12.5).description(" Lunch "),
            &connection,
        )
        .expect("Could not create transaction");

        assert_eq!(transaction.description, "Lunch");
        assert_eq!(get_transaction(transaction.id, &connection), Ok(transaction));
    }

    #[test]
    fn create_for_missing_account_fails() {
        let connection = get_test_connection();

        let result = upsert_transaction(
            Transaction::build(42, date!(2024 - 01 - 05), 1.0),
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidAccount));
    }

    #[test]
    fn upsert_updates_transaction_with_same_legacy_id() {
        let connection = get_test_connection();
        let account = create_test_account("Everyday", &connection);
        let first = upsert_transaction(
            Transaction::build(account.id, date!(2024 - 01 - 05), 1.0).legacy_id("tx-1"),
            &connection,
        )
        .unwrap();

        let second = upsert_transaction(
            Transaction::build(account.id, date!(2024 - 01 - 06), 2.0).legacy_id("tx-1"),
            &connection,
        )
        .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(
            get_transactions_for_account(account.id, &connection),
            Ok(vec![second])
        );
    }

    #[test]
    fn transactions_for_account_are_newest_first() {
        let connection = get_test_connection();
        let account = create_test_account("Everyday", &connection);
        let other = create_test_account("Other", &connection);
        for (day, amount) in [(3, 3.0), (1, 1.0), (2, 2.0)] {
            let date = date!(2024 - 01 - 01).replace_day(day).unwrap();
            upsert_transaction(Transaction::build(account.id, date, amount), &connection).unwrap();
        }
        upsert_transaction(
            Transaction::build(other.id, date!(2024 - 01 - 09), 9.0),
            &connection,
        )
        .unwrap();

        let amounts: Vec<_> = get_transactions_for_account(account.id, &connection)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.amount)
            .collect();

        assert_eq!(amounts, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn deleting_account_deletes_transactions() {
        let connection = get_test_connection();
        let account = create_test_account("Everyday", &connection);
        let transaction = upsert_transaction(
            Transaction::build(account.id, date!(2024 - 01 - 05), 1.0),
            &connection,
        )
        .unwrap();

        delete_account(account.id, &connection).unwrap();

        assert_eq!(
            get_transaction(transaction.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_transaction_removes_it() {
        let connection = get_test_connection();
        let account = create_test_account("Everyday", &connection);
        let transaction = upsert_transaction(
            Transaction::build(account.id, date!(2024 - 01 - 05), 1.0),
            &connection,
        )
        .unwrap();

        assert_eq!(delete_transaction(transaction.id, &connection), Ok(()));
        assert_eq!(
            delete_transaction(transaction.id, &connection),
            Err(Error::DeleteMissingTransaction)
        );
    }
}

use std::collections::HashMap;

use rusqlite::{Connection, Row, params};
use time::Date;

use crate::{Error, account::AccountId, database_id::DatabaseId};

pub type BalanceId = DatabaseId;

/// The value of an account on a given day.
///
/// Liabilities are recorded as the positive amount owed.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    /// The id for the account balance.
    pub id: BalanceId,
    /// The account the balance belongs to.
    pub account_id: AccountId,
    /// The day the balance was checked.
    pub date: Date,
    /// The balance in dollars.
    pub value: f64,
}

/// SQLite's extended result code for a failed FOREIGN KEY constraint.
const SQLITE_CONSTRAINT_FOREIGNKEY: i32 = 787;

/// Record the balance of an account on `date`.
///
/// An account has at most one balance per day, so an existing balance for
/// the same account and date is replaced.
///
/// # Errors
///
/// Returns [Error::InvalidAccount] if the account does not exist.
pub fn upsert_balance(
    account_id: AccountId,
    date: Date,
    value: f64,
    connection: &Connection,
) -> Result<Balance, Error> {
    let id = connection
        .query_row(
            "INSERT INTO balance (account_id, date, value) VALUES (?1, ?2, ?3)
            ON CONFLICT(account_id, date) DO UPDATE SET value = excluded.value
            RETURNING id;",
            params![account_id, date, value],
            |row| row.get(0),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(error, Some(_))
                if error.extended_code == SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                Error::InvalidAccount
            }
            error => error.into(),
        })?;

    Ok(Balance {
        id,
        account_id,
        date,
        value,
    })
}

#[cfg(test)]
pub fn get_balance(balance_id: BalanceId, connection: &Connection) -> Result<Balance, Error> {
    connection
        .query_row(
            "SELECT id, account_id, date, value FROM balance WHERE id = ?1",
            [balance_id],
            map_row_to_balance,
        )
        .map_err(Error::from)
}

/// The balances of an account, most recent first.
pub fn get_balances_for_account(
    account_id: AccountId,
    connection: &Connection,
) -> Result<Vec<Balance>, Error> {
    connection
        .prepare(
            "SELECT id, account_id, date, value FROM balance
            WHERE account_id = ?1
            ORDER BY date DESC",
        )?
        .query_map([account_id], map_row_to_balance)?
        .map(|maybe_balance| maybe_balance.map_err(Error::from))
        .collect()
}

/// The most recent balance of every account that has one.
pub fn get_latest_balances(connection: &Connection) -> Result<HashMap<AccountId, f64>, Error> {
    connection
        .prepare(
            "SELECT b.account_id, b.value FROM balance b
            WHERE b.date = (SELECT MAX(date) FROM balance WHERE account_id = b.account_id)",
        )?
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .map(|maybe_pair| maybe_pair.map_err(Error::from))
        .collect()
}

/// The date of the oldest balance across all accounts.
pub fn get_earliest_balance_date(connection: &Connection) -> Result<Option<Date>, Error> {
    connection
        .query_row("SELECT MIN(date) FROM balance", [], |row| {
            row.get::<_, Option<Date>>(0)
        })
        .map_err(Error::from)
}

/// Delete a balance and return it.
///
/// # Errors
///
/// Returns [Error::DeleteMissingBalance] if there is no balance with `balance_id`.
pub fn delete_balance(balance_id: BalanceId, connection: &Connection) -> Result<Balance, Error> {
    connection
        .query_row(
            "DELETE FROM balance WHERE id = ?1 RETURNING id, account_id, date, value",
            [balance_id],
            map_row_to_balance,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::DeleteMissingBalance,
            error => error.into(),
        })
}

pub fn create_balance_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS balance (
            id INTEGER PRIMARY KEY,
            account_id INTEGER NOT NULL REFERENCES account(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            value REAL NOT NULL,
            UNIQUE(account_id, date)
        );

        CREATE INDEX IF NOT EXISTS idx_balance_date ON balance(date);",
    )?;

    Ok(())
}

pub fn map_row_to_balance(row: &Row) -> Result<Balance, rusqlite::Error> {
    Ok(Balance {
        id: row.get(0)?,
        account_id: row.get(1)?,
        date: row.get(2)?,
        value: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        account::{Account, NewAccount, create_account},
        category::{CategoryName, get_or_create_category},
        profile::OwnerType,
        test_utils::get_test_connection,
    };

    use super::{
        delete_balance, get_balance, get_balances_for_account, get_earliest_balance_date,
        get_latest_balances, upsert_balance,
    };

    fn create_test_account(name: &str, connection: &Connection) -> Account {
        let category =
            get_or_create_category(CategoryName::new_unchecked("Savings"), connection).unwrap();

        create_account(
            NewAccount::new(name, "", &category, OwnerType::Me).unwrap(),
            connection,
        )
        .unwrap()
    }

    #[test]
    fn upsert_creates_balance() {
        let connection = get_test_connection();
        let account = create_test_account("Savings", &connection);

        let balance = upsert_balance(account.id, date!(2024 - 01 - 31), 100.5, &connection)
            .expect("Could not create balance");

        assert_eq!(get_balance(balance.id, &connection), Ok(balance));
    }

    #[test]
    fn upsert_replaces_balance_on_same_day() {
        let connection = get_test_connection();
        let account = create_test_account("Savings", &connection);
        let first = upsert_balance(account.id, date!(2024 - 01 - 31), 100.0, &connection).unwrap();

        let second = upsert_balance(account.id, date!(2024 - 01 - 31), 250.0, &connection).unwrap();

        assert_eq!(first.id, second.id);
        let balances = get_balances_for_account(account.id, &connection).unwrap();
        assert_eq!(balances, vec![second]);
    }

    #[test]
    fn upsert_for_missing_account_fails() {
        let connection = get_test_connection();

        let result = upsert_balance(42, date!(2024 - 01 - 31), 1.0, &connection);

        assert_eq!(result, Err(Error::InvalidAccount));
    }

    #[test]
    fn balances_for_account_are_newest_first() {
        let connection = get_test_connection();
        let account = create_test_account("Savings", &connection);
        let other = create_test_account("Other", &connection);
        upsert_balance(account.id, date!(2024 - 01 - 31), 1.0, &connection).unwrap();
        upsert_balance(account.id, date!(2024 - 03 - 31), 3.0, &connection).unwrap();
        upsert_balance(account.id, date!(2024 - 02 - 29), 2.0, &connection).unwrap();
        upsert_balance(other.id, date!(2024 - 04 - 30), 4.0, &connection).unwrap();

        let values: Vec<_> = get_balances_for_account(account.id, &connection)
            .unwrap()
            .into_iter()
            .map(|balance| balance.value)
            .collect();

        assert_eq!(values, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn latest_balances_pick_most_recent_date() {
        let connection = get_test_connection();
        let savings = create_test_account("Savings", &connection);
        let checking = create_test_account("Checking", &connection);
        let empty = create_test_account("Empty", &connection);
        upsert_balance(savings.id, date!(2024 - 03 - 01), 30.0, &connection).unwrap();
        upsert_balance(savings.id, date!(2024 - 01 - 01), 10.0, &connection).unwrap();
        upsert_balance(checking.id, date!(2023 - 12 - 01), 5.0, &connection).unwrap();

        let latest = get_latest_balances(&connection).unwrap();

        assert_eq!(latest.get(&savings.id), Some(&30.0));
        assert_eq!(latest.get(&checking.id), Some(&5.0));
        assert_eq!(latest.get(&empty.id), None);
    }

    #[test]
    fn earliest_balance_date() {
        let connection = get_test_connection();
        assert_eq!(get_earliest_balance_date(&connection), Ok(None));

        let account = create_test_account("Savings", &connection);
        upsert_balance(account.id, date!(2024 - 03 - 01), 30.0, &connection).unwrap();
        upsert_balance(account.id, date!(2023 - 11 - 15), 10.0, &connection).unwrap();

        assert_eq!(
            get_earliest_balance_date(&connection),
            Ok(Some(date!(2023 - 11 - 15)))
        );
    }

    #[test]
    fn delete_returns_deleted_balance() {
        let connection = get_test_connection();
        let account = create_test_account("Savings", &connection);
        let balance = upsert_balance(account.id, date!(2024 - 03 - 01), 30.0, &connection).unwrap();

        assert_eq!(delete_balance(balance.id, &connection), Ok(balance.clone()));
        assert_eq!(get_balance(balance.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_balance_fails() {
        let connection = get_test_connection();

        assert_eq!(
            delete_balance(1, &connection),
            Err(Error::DeleteMissingBalance)
        );
    }
}

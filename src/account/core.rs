//! Account domain types and database operations.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
    profile::OwnerType,
};

pub type AccountId = i64;

/// Whether an account holds value or is owed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Asset,
    Liability,
}

impl AccountType {
    /// The account type for accounts in the category `name`.
    pub fn for_category(name: &CategoryName) -> Self {
        if name.is_liability() {
            AccountType::Liability
        } else {
            AccountType::Asset
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => "asset",
            AccountType::Liability => "liability",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Asset => "Asset",
            AccountType::Liability => "Liability",
        }
    }
}

impl FromStr for AccountType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Ok(AccountType::Asset),
            "liability" => Ok(AccountType::Liability),
            _ => Err(Error::InvalidAccountType(s.to_owned())),
        }
    }
}

impl Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for AccountType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AccountType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// A validated, non-empty account name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AccountName(String);

impl AccountName {
    /// Create an account name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyAccountName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyAccountName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create an account name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for AccountName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bank account, investment, loan or any other holding whose balance is tracked.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    /// The ID of the account in the data it was imported from, if any.
    pub legacy_id: Option<String>,
    pub name: AccountName,
    /// The institution that holds the account, may be empty.
    pub bank: String,
    pub category_id: CategoryId,
    pub owner: OwnerType,
    pub account_type: AccountType,
    pub created_at: OffsetDateTime,
}

/// The fields for creating or updating an account.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub legacy_id: Option<String>,
    pub name: AccountName,
    pub bank: String,
    pub category_id: CategoryId,
    pub owner: OwnerType,
    pub account_type: AccountType,
}

impl NewAccount {
    /// Describe an account in `category`, deriving its type from the category name.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyAccountName] if `name` is blank.
    pub fn new(
        name: &str,
        bank: &str,
        category: &Category,
        owner: OwnerType,
    ) -> Result<Self, Error> {
        Ok(Self {
            legacy_id: None,
            name: AccountName::new(name)?,
            bank: bank.trim().to_owned(),
            category_id: category.id,
            owner,
            account_type: AccountType::for_category(&category.name),
        })
    }

    /// Set the ID the account had in imported data. A blank ID is ignored.
    pub fn with_legacy_id(mut self, legacy_id: &str) -> Self {
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
            Error::InvalidCategory
        }
        error => error.into(),
    }
}

/// The current time truncated to whole seconds.
fn now_to_the_second() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now - Duration::nanoseconds(i64::from(now.nanosecond()))
}

const ACCOUNT_COLUMNS: &str =
    "id, legacy_id, name, bank, category_id, owner, account_type, created_at";

/// Create an account and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::InvalidCategory] if the category does not exist.
pub fn create_account(account: NewAccount, connection: &Connection) -> Result<Account, Error> {
    let created_at = now_to_the_second();

    connection
        .execute(
            "INSERT INTO account (legacy_id, name, bank, category_id, owner, account_type, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                account.legacy_id,
                account.name.as_ref(),
                account.bank,
                account.category_id,
                account.owner,
                account.account_type,
                created_at,
            ],
        )
        .map_err(map_foreign_key_violation)?;

    Ok(Account {
        id: connection.last_insert_rowid(),
        legacy_id: account.legacy_id,
        name: account.name,
        bank: account.bank,
        category_id: account.category_id,
        owner: account.owner,
        account_type: account.account_type,
        created_at,
    })
}

/// Create the account or, if an account with the same legacy ID exists, update it.
///
/// Returns the ID of the created or updated account. Accounts without a
/// legacy ID are always created.
pub fn upsert_account(account: NewAccount, connection: &Connection) -> Result<AccountId, Error> {
    connection
        .query_row(
            "INSERT INTO account (legacy_id, name, bank, category_id, owner, account_type, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(legacy_id) DO UPDATE SET
                name = excluded.name,
                bank = excluded.bank,
                category_id = excluded.category_id,
                owner = excluded.owner,
                account_type = excluded.account_type
            RETURNING id;",
            params![
                account.legacy_id,
                account.name.as_ref(),
                account.bank,
                account.category_id,
                account.owner,
                account.account_type,
                now_to_the_second(),
            ],
            |row| row.get(0),
        )
        .map_err(map_foreign_key_violation)
}

/// Retrieve a single account by ID.
pub fn get_account(account_id: AccountId, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account WHERE id = :id;"
        ))?
        .query_row(&[(":id", &account_id)], map_row_to_account)
        .map_err(|error| error.into())
}

/// Find the ID of the account imported with `legacy_id`.
pub fn get_account_id_by_legacy_id(
    legacy_id: &str,
    connection: &Connection,
) -> Result<AccountId, Error> {
    connection
        .query_row(
            "SELECT id FROM account WHERE legacy_id = ?1;",
            [legacy_id],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Retrieve all accounts ordered alphabetically by name.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account ORDER BY name ASC;"
        ))?
        .query_map([], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Update an account's details. The legacy ID and creation time are left unchanged.
pub fn update_account(
    account_id: AccountId,
    account: &NewAccount,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE account SET
                name = ?1,
                bank = ?2,
                category_id = ?3,
                owner = ?4,
                account_type = ?5
            WHERE id = ?6;",
            params![
                account.name.as_ref(),
                account.bank,
                account.category_id,
                account.owner,
                account.account_type,
                account_id,
            ],
        )
        .map_err(map_foreign_key_violation)?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingAccount);
    }

    Ok(())
}

/// Delete an account along with its balances and transactions.
pub fn delete_account(account_id: AccountId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM account WHERE id = ?1", [account_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingAccount);
    }

    Ok(())
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            legacy_id TEXT UNIQUE,
            name TEXT NOT NULL,
            bank TEXT NOT NULL DEFAULT '',
            category_id INTEGER NOT NULL REFERENCES category(id) ON DELETE RESTRICT,
            owner TEXT NOT NULL CHECK (owner IN ('me', 'spouse', 'joint')),
            account_type TEXT NOT NULL CHECK (account_type IN ('asset', 'liability')),
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_account_category ON account(category_id);",
    )?;

    Ok(())
}

pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    let raw_name: String = row.get(2)?;

    Ok(Account {
        id: row.get(0)?,
        legacy_id: row.get(1)?,
        name: AccountName::new_unchecked(&raw_name),
        bank: row.get(3)?,
        category_id: row.get(4)?,
        owner: row.get(5)?,
        account_type: row.get(6)?,
        created_at: row.get(7)?,
    })
}

#[cfg(test)]
mod account_type_tests {
    use crate::{
        Error,
        account::AccountType,
        category::CategoryName,
    };

    #[test]
    fn derives_type_from_category_name() {
        assert_eq!(
            AccountType::for_category(&CategoryName::new_unchecked("Home Mortgage")),
            AccountType::Liability
        );
        assert_eq!(
            AccountType::for_category(&CategoryName::new_unchecked("Savings")),
            AccountType::Asset
        );
    }

    #[test]
    fn parses_stored_values() {
        assert_eq!("asset".parse(), Ok(AccountType::Asset));
        assert_eq!("Liability".parse(), Ok(AccountType::Liability));
        assert_eq!(
            "equity".parse::<AccountType>(),
            Err(Error::InvalidAccountType("equity".to_owned()))
        );
    }
}

//! Database operations for categories.

use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    account::AccountType,
    category::{Category, CategoryId, CategoryName},
};

/// SQLite's extended result code for a failed UNIQUE constraint.
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

fn map_unique_violation(error: rusqlite::Error, name: &CategoryName) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(error, Some(_))
            if error.extended_code == SQLITE_CONSTRAINT_UNIQUE =>
        {
            Error::DuplicateCategoryName(name.to_string())
        }
        error => error.into(),
    }
}

/// Create a category and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::DuplicateCategoryName] if a category with the same name
/// (ignoring case) already exists.
pub fn create_category(name: CategoryName, connection: &Connection) -> Result<Category, Error> {
    connection
        .execute("INSERT INTO category (name) VALUES (?1);", (name.as_ref(),))
        .map_err(|error| map_unique_violation(error, &name))?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM category ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Find the category called `name` (ignoring case), creating it if it does not exist.
pub fn get_or_create_category(
    name: CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    let existing = connection
        .prepare("SELECT id, name FROM category WHERE name = ?1;")?
        .query_row((name.as_ref(),), map_row)
        .optional()?;

    match existing {
        Some(category) => Ok(category),
        None => create_category(name, connection),
    }
}

/// Rename a category.
///
/// The accounts in the category are reclassified as assets or liabilities
/// to match the new name.
pub fn update_category(
    category_id: CategoryId,
    new_name: CategoryName,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1 WHERE id = ?2",
            (new_name.as_ref(), category_id),
        )
        .map_err(|error| map_unique_violation(error, &new_name))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    connection.execute(
        "UPDATE account SET account_type = ?1 WHERE category_id = ?2",
        (AccountType::for_category(&new_name), category_id),
    )?;

    Ok(())
}

/// Delete a category by ID.
///
/// # Errors
///
/// Returns [Error::CategoryInUse] if any account is still in the category and
/// [Error::DeleteMissingCategory] if the category does not exist.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let category = match get_category(category_id, connection) {
        Ok(category) => category,
        Err(Error::NotFound) => return Err(Error::DeleteMissingCategory),
        Err(error) => return Err(error),
    };

    let account_count: i64 = connection.query_row(
        "SELECT COUNT(*) FROM account WHERE category_id = ?1",
        [category_id],
        |row| row.get(0),
    )?;

    if account_count > 0 {
        return Err(Error::CategoryInUse(category.name.to_string()));
    }

    connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    Ok(())
}

/// Count the accounts in each category. Categories without accounts are omitted.
pub fn count_accounts_per_category(
    connection: &Connection,
) -> Result<HashMap<CategoryId, u32>, Error> {
    let result: Result<HashMap<CategoryId, u32>, rusqlite::Error> = connection
        .prepare("SELECT category_id, COUNT(1) FROM account GROUP BY category_id")?
        .query_map((), |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect();

    result.map_err(Error::from)
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE COLLATE NOCASE
        );",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category { id, name })
}

use std::collections::HashMap;

use rusqlite::{Connection, Row, params, types::Type};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    account::AccountType,
    balance::get_earliest_balance_date,
    category::CategoryId,
    db::with_transaction,
    format::parse_local_date,
};

use super::month::{month_end, month_key, month_start, next_month};

/// The totals across all accounts at the end of a month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySnapshot {
    /// The first day of the month.
    pub month: Date,
    pub assets_total: f64,
    /// The total amount owed, as a positive number.
    pub liabilities_total: f64,
    /// Assets minus liabilities.
    pub net_worth: f64,
    pub created_at: OffsetDateTime,
}

/// The total of the accounts of one type in one category at the end of a month.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub category_name: String,
    pub account_type: AccountType,
    pub total: f64,
}

/// Compute and store the snapshot for the month containing `month`.
///
/// Each account counts with its latest balance dated on or before the last
/// day of the month. Accounts without such a balance are left out. Any
/// existing snapshot for the month is replaced.
pub fn take_snapshot(month: Date, connection: &Connection) -> Result<MonthlySnapshot, Error> {
    let month = month_start(month);
    let key = month_key(month);

    with_transaction(connection, |connection| {
        let mut assets_total = 0.0;
        let mut liabilities_total = 0.0;
        let mut category_totals: HashMap<(CategoryId, AccountType), f64> = HashMap::new();

        for (category_id, account_type, value) in account_values_at(month_end(month), connection)?
        {
            match account_type {
                AccountType::Asset => assets_total += value,
                AccountType::Liability => liabilities_total += value,
            }

            *category_totals
                .entry((category_id, account_type))
                .or_default() += value;
        }

        let snapshot = MonthlySnapshot {
            month,
            assets_total,
            liabilities_total,
            net_worth: assets_total - liabilities_total,
            created_at: OffsetDateTime::now_utc(),
        };

        connection.execute(
            "INSERT INTO monthly_snapshot (month, assets_total, liabilities_total, net_worth, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(month) DO UPDATE SET
                assets_total = excluded.assets_total,
                liabilities_total = excluded.liabilities_total,
                net_worth = excluded.net_worth,
                created_at = excluded.created_at",
            params![
                key,
                snapshot.assets_total,
                snapshot.liabilities_total,
                snapshot.net_worth,
                snapshot.created_at,
            ],
        )?;

        connection.execute("DELETE FROM category_snapshot WHERE month = ?1", [&key])?;

        let mut insert_category = connection.prepare(
            "INSERT INTO category_snapshot (month, category_id, type, total)
            VALUES (?1, ?2, ?3, ?4)",
        )?;

        for ((category_id, account_type), total) in category_totals {
            insert_category.execute(params![key, category_id, account_type, total])?;
        }

        tracing::debug!(
            "Took snapshot for {key}: net worth {}",
            snapshot.net_worth
        );

        Ok(snapshot)
    })
}

/// The category, type and balance of every account as of `date`.
fn account_values_at(
    date: Date,
    connection: &Connection,
) -> Result<Vec<(CategoryId, AccountType, f64)>, Error> {
    connection
        .prepare(
            "SELECT a.category_id, a.account_type, b.value
            FROM account a
            JOIN balance b ON b.account_id = a.id
            WHERE b.date = (
                SELECT MAX(date) FROM balance WHERE account_id = a.id AND date <= ?1
            )",
        )?
        .query_map([date], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .map(|maybe_value| maybe_value.map_err(Error::from))
        .collect()
}

/// Recompute the snapshots for every month from the one containing `from`
/// up to and including the month containing `today`.
///
/// Returns the number of months that were recomputed.
pub fn refresh_snapshots_from(
    from: Date,
    today: Date,
    connection: &Connection,
) -> Result<usize, Error> {
    let last_month = month_start(from.max(today));

    with_transaction(connection, |connection| {
        let mut month = Some(month_start(from));
        let mut count = 0;

        while let Some(current) = month.filter(|month| *month <= last_month) {
            take_snapshot(current, connection)?;
            count += 1;
            month = next_month(current);
        }

        Ok(count)
    })
}

/// Delete every snapshot and recompute them from the month of the earliest
/// balance up to the month containing `today`.
///
/// Returns the number of months that were recomputed.
pub fn rebuild_all_snapshots(today: Date, connection: &Connection) -> Result<usize, Error> {
    with_transaction(connection, |connection| {
        connection.execute_batch(
            "DELETE FROM category_snapshot;
            DELETE FROM monthly_snapshot;",
        )?;

        match get_earliest_balance_date(connection)? {
            Some(earliest) => refresh_snapshots_from(earliest, today, connection),
            None => Ok(0),
        }
    })
    .inspect(|count| tracing::info!("Rebuilt {count} monthly snapshots"))
}

/// All monthly snapshots, oldest first.
pub fn get_monthly_snapshots(connection: &Connection) -> Result<Vec<MonthlySnapshot>, Error> {
    connection
        .prepare(
            "SELECT month, assets_total, liabilities_total, net_worth, created_at
            FROM monthly_snapshot
            ORDER BY month ASC",
        )?
        .query_map([], map_row_to_monthly_snapshot)?
        .map(|maybe_snapshot| maybe_snapshot.map_err(Error::from))
        .collect()
}

/// The category totals for the month containing `month`, largest first.
pub fn get_category_totals(
    month: Date,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT s.category_id, c.name, s.type, s.total
            FROM category_snapshot s
            INNER JOIN category c ON c.id = s.category_id
            WHERE s.month = ?1
            ORDER BY s.total DESC, c.name ASC",
        )?
        .query_map([month_key(month_start(month))], |row| {
            Ok(CategoryTotal {
                category_id: row.get(0)?,
                category_name: row.get(1)?,
                account_type: row.get(2)?,
                total: row.get(3)?,
            })
        })?
        .map(|maybe_total| maybe_total.map_err(Error::from))
        .collect()
}

fn map_row_to_monthly_snapshot(row: &Row) -> Result<MonthlySnapshot, rusqlite::Error> {
    let raw_month: String = row.get(0)?;
    let month = parse_local_date(&raw_month)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(error)))?;

    Ok(MonthlySnapshot {
        month,
        assets_total: row.get(1)?,
        liabilities_total: row.get(2)?,
        net_worth: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn create_snapshot_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS monthly_snapshot (
            month TEXT PRIMARY KEY,
            assets_total REAL NOT NULL,
            liabilities_total REAL NOT NULL,
            net_worth REAL NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS category_snapshot (
            id INTEGER PRIMARY KEY,
            month TEXT NOT NULL,
            category_id INTEGER NOT NULL REFERENCES category(id) ON DELETE CASCADE,
            type TEXT NOT NULL CHECK (type IN ('asset', 'liability')),
            total REAL NOT NULL,
            UNIQUE(month, category_id, type)
        );",
    )?;

    Ok(())
}

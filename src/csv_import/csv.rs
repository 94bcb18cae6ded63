//! Parsing of the CSV exports for accounts, balances and transactions.
//!
//! The kind of file is recognised from its header row:
//!
//! - accounts: `id,name,bank,category,owner`
//! - balances: `account_id,date,value`
//! - transactions: `id,account_id,date,amount,description`
//!
//! The `id` and `account_id` columns hold the IDs the rows had in the data
//! they were exported from, not IDs in this database.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, de::DeserializeOwned};

use crate::Error;

const ACCOUNT_HEADERS: [&str; 5] = ["id", "name", "bank", "category", "owner"];
const BALANCE_HEADERS: [&str; 3] = ["account_id", "date", "value"];
const TRANSACTION_HEADERS: [&str; 5] = ["id", "account_id", "date", "amount", "description"];

/// A row from an accounts CSV file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccountRow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bank: String,
    pub category: String,
    /// Either an owner type ("me", "spouse", "joint") or a display name.
    #[serde(default)]
    pub owner: String,
}

/// A row from a balances CSV file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BalanceRow {
    pub account_id: String,
    pub date: String,
    pub value: f64,
}

/// A row from a transactions CSV file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionRow {
    pub id: String,
    pub account_id: String,
    pub date: String,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
}

/// The rows of a parsed CSV file.
#[derive(Debug, Clone, PartialEq)]
pub enum CsvFile {
    Accounts(Vec<AccountRow>),
    Balances(Vec<BalanceRow>),
    Transactions(Vec<TransactionRow>),
}

fn headers_match(headers: &StringRecord, expected: &[&str]) -> bool {
    headers.len() == expected.len()
        && headers
            .iter()
            .zip(expected)
            .all(|(header, expected)| header.trim().eq_ignore_ascii_case(expected))
}

fn deserialize_rows<T: DeserializeOwned>(
    reader: &mut csv::Reader<&[u8]>,
    expected: &[&str],
) -> Result<Vec<T>, Error> {
    // Normalise the header row so that e.g. "Account_ID" still maps onto the row fields.
    reader.set_headers(StringRecord::from(expected.to_vec()));

    reader
        .deserialize()
        .enumerate()
        .map(|(index, row)| {
            // The header is line 1, so the first row is line 2.
            row.map_err(|error| Error::InvalidCSV(format!("Line {}: {error}", index + 2)))
        })
        .collect()
}

/// Parse a CSV file, recognising the kind of rows it holds from its header.
///
/// # Errors
///
/// Returns [Error::InvalidCSV] if the header is not one of the known formats
/// or a row cannot be read.
pub fn parse_csv(text: &str) -> Result<CsvFile, Error> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| Error::InvalidCSV(format!("Could not read the header row: {error}")))?
        .clone();

    if headers_match(&headers, &ACCOUNT_HEADERS) {
        deserialize_rows(&mut reader, &ACCOUNT_HEADERS).map(CsvFile::Accounts)
    } else if headers_match(&headers, &BALANCE_HEADERS) {
        deserialize_rows(&mut reader, &BALANCE_HEADERS).map(CsvFile::Balances)
    } else if headers_match(&headers, &TRANSACTION_HEADERS) {
        deserialize_rows(&mut reader, &TRANSACTION_HEADERS).map(CsvFile::Transactions)
    } else {
        Err(Error::InvalidCSV(format!(
            "Unrecognised header \"{}\". Expected one of \"{}\", \"{}\" or \"{}\".",
            headers.iter().collect::<Vec<_>>().join(","),
            ACCOUNT_HEADERS.join(","),
            BALANCE_HEADERS.join(","),
            TRANSACTION_HEADERS.join(","),
        )))
    }
}

//! Saving parsed CSV rows to the database.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    account::{
        AccountId, NewAccount, get_account_id_by_legacy_id, owner_type_from_label,
        upsert_account,
    },
    balance::upsert_balance,
    category::{CategoryName, get_or_create_category},
    csv_import::csv::{AccountRow, BalanceRow, CsvFile, TransactionRow},
    db::with_transaction,
    format::parse_local_date,
    profile::{OwnerType, Profile, get_profile},
    snapshot::rebuild_all_snapshots,
    transaction::{Transaction, upsert_transaction},
};

/// How many rows of each kind were imported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub accounts: usize,
    pub balances: usize,
    pub transactions: usize,
    /// The number of monthly snapshots rebuilt after importing.
    pub snapshots: usize,
}

/// Import the rows of `files` and rebuild the snapshots, all or nothing.
///
/// Accounts are imported before balances and transactions so that a single
/// upload can contain an accounts file along with the files that refer to it.
/// Rows whose ID was imported before update the existing row.
///
/// # Errors
///
/// Returns [Error::InvalidCSV] if a row refers to an unknown account or holds
/// an invalid value, in which case nothing is imported.
pub fn import_files(
    files: Vec<CsvFile>,
    today: Date,
    connection: &Connection,
) -> Result<ImportSummary, Error> {
    let mut accounts = Vec::new();
    let mut balances = Vec::new();
    let mut transactions = Vec::new();

    for file in files {
        match file {
            CsvFile::Accounts(rows) => accounts.extend(rows),
            CsvFile::Balances(rows) => balances.extend(rows),
            CsvFile::Transactions(rows) => transactions.extend(rows),
        }
    }

    with_transaction(connection, |connection| {
        let profile = get_profile(connection)?;

        for row in &accounts {
            import_account(row, &profile, connection)?;
        }

        for row in &balances {
            import_balance(row, connection)?;
        }

        for row in &transactions {
            import_transaction(row, connection)?;
        }

        let snapshots = rebuild_all_snapshots(today, connection)?;

        Ok(ImportSummary {
            accounts: accounts.len(),
            balances: balances.len(),
            transactions: transactions.len(),
            snapshots,
        })
    })
}

/// Resolve the owner column, which holds an owner type or a display name.
fn parse_owner(owner: &str, profile: &Profile) -> OwnerType {
    owner
        .parse()
        .unwrap_or_else(|_| owner_type_from_label(owner, profile))
}

fn import_account(
    row: &AccountRow,
    profile: &Profile,
    connection: &Connection,
) -> Result<(), Error> {
    let invalid_row = |error: Error| Error::InvalidCSV(format!("Account \"{}\": {error}", row.id));

    let category_name = CategoryName::new(&row.category).map_err(invalid_row)?;
    let category = get_or_create_category(category_name, connection)?;
    let account = NewAccount::new(
        &row.name,
        &row.bank,
        &category,
        parse_owner(&row.owner, profile),
    )
    .map_err(invalid_row)?
    .with_legacy_id(&row.id);

    upsert_account(account, connection)?;

    Ok(())
}

fn find_account(legacy_id: &str, connection: &Connection) -> Result<AccountId, Error> {
    get_account_id_by_legacy_id(legacy_id, connection).map_err(|error| match error {
        Error::NotFound => Error::InvalidCSV(format!(
            "Unknown account \"{legacy_id}\". Import the accounts file first or in the same upload."
        )),
        error => error,
    })
}

fn parse_date(text: &str) -> Result<Date, Error> {
    parse_local_date(text).map_err(|error| Error::InvalidCSV(error.to_string()))
}

fn import_balance(row: &BalanceRow, connection: &Connection) -> Result<(), Error> {
    let account_id = find_account(&row.account_id, connection)?;
    upsert_balance(account_id, parse_date(&row.date)?, row.value, connection)?;

    Ok(())
}

fn import_transaction(row: &TransactionRow, connection: &Connection) -> Result<(), Error> {
    let account_id = find_account(&row.account_id, connection)?;
    let transaction = Transaction::build(account_id, parse_date(&row.date)?, row.amount)
        .description(&row.description)
        .legacy_id(&row.id);

    upsert_transaction(transaction, connection)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        account::{AccountType, get_account, get_account_id_by_legacy_id, get_all_accounts},
        balance::get_balances_for_account,
        csv_import::csv::parse_csv,
        profile::{OwnerType, Profile, save_profile},
        snapshot::get_monthly_snapshots,
        test_utils::get_test_connection,
        transaction::get_transactions_for_account,
    };

    use super::import_files;

    const ACCOUNTS: &str = "id,name,bank,category,owner\n\
        a1,Everyday,ANZ,Checking,me\n\
        a2,Home,Westpac,Mortgage,Joint\n\
        a3,Rainy day,ANZ,Savings,Sam\n";
    const BALANCES: &str = "account_id,date,value\n\
        a1,2024-01-31,1000\n\
        a2,2024-01-31,400\n\
        a1,2024-02-29,1200\n";
    const TRANSACTIONS: &str = "id,account_id,date,amount,description\n\
        t1,a1,2024-02-03,-12.5,Lunch\n";

    fn files(texts: &[&str]) -> Vec<crate::csv_import::csv::CsvFile> {
        texts.iter().map(|text| parse_csv(text).unwrap()).collect()
    }

    #[test]
    fn imports_all_kinds_and_rebuilds_snapshots() {
        let connection = get_test_connection();
        save_profile(
            &Profile {
                spouse_name: Some("Sam".to_owned()),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();

        // Files referring to accounts may come before the accounts file.
        let summary = import_files(
            files(&[TRANSACTIONS, BALANCES, ACCOUNTS]),
            date!(2024 - 02 - 29),
            &connection,
        )
        .unwrap();

        assert_eq!(summary.accounts, 3);
        assert_eq!(summary.balances, 3);
        assert_eq!(summary.transactions, 1);
        assert_eq!(summary.snapshots, 2);

        let home = get_account(
            get_account_id_by_legacy_id("a2", &connection).unwrap(),
            &connection,
        )
        .unwrap();
        assert_eq!(home.account_type, AccountType::Liability);
        assert_eq!(home.owner, OwnerType::Joint);
        let rainy_day = get_account(
            get_account_id_by_legacy_id("a3", &connection).unwrap(),
            &connection,
        )
        .unwrap();
        assert_eq!(rainy_day.owner, OwnerType::Spouse);

        let everyday = get_account_id_by_legacy_id("a1", &connection).unwrap();
        assert_eq!(get_balances_for_account(everyday, &connection).unwrap().len(), 2);
        assert_eq!(
            get_transactions_for_account(everyday, &connection).unwrap()[0].description,
            "Lunch"
        );

        let net_worth: Vec<f64> = get_monthly_snapshots(&connection)
            .unwrap()
            .into_iter()
            .map(|snapshot| snapshot.net_worth)
            .collect();
        assert_eq!(net_worth, vec![600.0, 800.0]);
    }

    #[test]
    fn reimporting_updates_existing_rows() {
        let connection = get_test_connection();
        import_files(files(&[ACCOUNTS, BALANCES]), date!(2024 - 02 - 29), &connection).unwrap();

        import_files(
            files(&[
                "id,name,bank,category,owner\na1,Everyday Renamed,ANZ,Checking,me\n",
                "account_id,date,value\na1,2024-02-29,1500\n",
            ]),
            date!(2024 - 02 - 29),
            &connection,
        )
        .unwrap();

        let accounts = get_all_accounts(&connection).unwrap();
        assert_eq!(accounts.len(), 3);
        let everyday = get_account_id_by_legacy_id("a1", &connection).unwrap();
        assert_eq!(
            get_account(everyday, &connection).unwrap().name.as_ref(),
            "Everyday Renamed"
        );
        let balances = get_balances_for_account(everyday, &connection).unwrap();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].value, 1500.0);
    }

    #[test]
    fn unknown_account_imports_nothing() {
        let connection = get_test_connection();

        let result = import_files(
            files(&[ACCOUNTS, "account_id,date,value\nmissing,2024-01-31,1\n"]),
            date!(2024 - 02 - 29),
            &connection,
        );

        assert!(
            matches!(result, Err(Error::InvalidCSV(ref details)) if details.contains("missing")),
            "got {result:?}"
        );
        assert_eq!(get_all_accounts(&connection).unwrap(), vec![]);
    }

    #[test]
    fn invalid_date_is_invalid_csv() {
        let connection = get_test_connection();

        let result = import_files(
            files(&[ACCOUNTS, "account_id,date,value\na1,31/01/2024,1\n"]),
            date!(2024 - 02 - 29),
            &connection,
        );

        assert!(matches!(result, Err(Error::InvalidCSV(_))), "got {result:?}");
    }

    #[test]
    fn rows_with_blank_ids_are_each_created() {
        let connection = get_test_connection();

        let summary = import_files(
            files(&[
                "id,name,bank,category,owner
                ,Everyday,ANZ,Checking,me
                ,Visa,Westpac,Credit Card,me
                a1,Savings,ANZ,Savings,me
",
                "id,account_id,date,amount,description
                ,a1,2024-02-03,-12.5,Lunch
                ,a1,2024-02-04,-8,Coffee
",
            ]),
            date!(2024 - 02 - 29),
            &connection,
        )
        .unwrap();

        assert_eq!(summary.accounts, 3);
        let mut names: Vec<String> = get_all_accounts(&connection)
            .unwrap()
            .into_iter()
            .map(|account| account.name.as_ref().to_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["Everyday", "Savings", "Visa"]);

        assert_eq!(summary.transactions, 2);
        let savings = get_account_id_by_legacy_id("a1", &connection).unwrap();
        assert_eq!(
            get_transactions_for_account(savings, &connection).unwrap().len(),
            2
        );
    }
}

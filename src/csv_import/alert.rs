//! Alert messages describing the result of an import.

use std::{sync::OnceLock, time::Duration};

use numfmt::{Formatter, Precision};

use crate::{alert::Alert, csv_import::import::ImportSummary};

/// Creates a success alert listing how many rows of each kind were imported.
pub fn import_success(summary: &ImportSummary, duration: Duration) -> Alert {
    let formatter = get_thousands_separator_formatter();
    let duration_ms = formatter.fmt_string(duration.as_millis());

    let counts: Vec<String> = [
        (summary.accounts, "account", "accounts"),
        (summary.balances, "balance", "balances"),
        (summary.transactions, "transaction", "transactions"),
    ]
    .into_iter()
    .filter(|(count, _, _)| *count > 0)
    .map(|(count, singular, plural)| {
        let noun = if count == 1 { singular } else { plural };
        format!("{} {noun}", formatter.fmt_string(count))
    })
    .collect();

    tracing::info!(
        "Import completed in {duration_ms}ms: {} accounts, {} balances, {} transactions, {} snapshots",
        summary.accounts,
        summary.balances,
        summary.transactions,
        summary.snapshots
    );

    if counts.is_empty() {
        return Alert::Success {
            message: "Import completed".to_owned(),
            details: format!("The files had no rows to import. Completed in {duration_ms}ms."),
        };
    }

    Alert::Success {
        message: "Import completed successfully!".to_owned(),
        details: format!(
            "Imported {} and rebuilt {} monthly snapshots in {duration_ms}ms.",
            counts.join(", "),
            formatter.fmt_string(summary.snapshots),
        ),
    }
}

fn get_thousands_separator_formatter() -> &'static Formatter {
    static FORMATTER: OnceLock<Formatter> = OnceLock::new();

    FORMATTER.get_or_init(|| {
        Formatter::new()
            .separator(',')
            .expect("',' is a valid separator")
            .precision(Precision::Decimals(0))
    })
}

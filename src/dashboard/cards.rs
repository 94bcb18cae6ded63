//! Summary cards for the latest month: net worth, assets, liabilities and
//! the change in net worth since the previous month.

use maud::{Markup, html};

use crate::{
    format::{DateStyle, format_compact_currency, format_currency, format_date},
    snapshot::MonthlySnapshot,
};

/// The figures shown in the summary cards.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Summary {
    pub latest: MonthlySnapshot,
    /// The change in net worth since the previous snapshot, if there is one.
    pub change: Option<f64>,
}

impl Summary {
    /// Summarise the most recent of `snapshots`, which must be sorted by month.
    ///
    /// Returns `None` if there are no snapshots.
    pub fn from_snapshots(snapshots: &[MonthlySnapshot]) -> Option<Self> {
        let (latest, earlier) = snapshots.split_last()?;

        Some(Self {
            latest: latest.clone(),
            change: earlier
                .last()
                .map(|previous| latest.net_worth - previous.net_worth),
        })
    }
}

fn card(id: &str, title: &str, value: &str, compact_value: &str, value_class: &str) -> Markup {
    html! {
        div
            id=(id)
            class="bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-4 shadow-md"
        {
            h3 class="text-sm font-medium text-gray-600 dark:text-gray-400" { (title) }
            p class={"mt-2 text-2xl font-semibold " (value_class)} { (value) }
            p class="card-compact text-xs text-gray-500 dark:text-gray-400" { (compact_value) }
        }
    }
}

fn money_card(id: &str, title: &str, value: f64) -> Markup {
    card(
        id,
        title,
        &format_currency(value),
        &format_compact_currency(value),
        "",
    )
}

/// Renders the row of summary cards.
pub(super) fn summary_cards_view(summary: &Summary) -> Markup {
    let latest = &summary.latest;
    // Compare in cents so a change that displays as $0.00 gets no sign.
    let change_cents = summary.change.map(|change| (change * 100.0).round());
    let (change_text, compact_change, change_class) = match (summary.change, change_cents) {
        (Some(change), Some(cents)) if cents > 0.0 => (
            format!("+{}", format_currency(change)),
            format!("+{}", format_compact_currency(change)),
            "text-green-600 dark:text-green-400",
        ),
        (Some(change), Some(cents)) if cents < 0.0 => (
            format_currency(change),
            format_compact_currency(change),
            "text-red-600 dark:text-red-400",
        ),
        (Some(_), _) => (format_currency(0.0), format_compact_currency(0.0), ""),
        _ => ("-".to_owned(), String::new(), "text-gray-400"),
    };

    html! {
        section class="w-full mx-auto mb-8"
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h2 class="text-xl font-semibold" { "Summary" }
                span class="text-sm text-gray-600 dark:text-gray-400"
                {
                    (format_date(latest.month, DateStyle::MonthYear))
                }
            }

            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
            {
                (money_card("net-worth-card", "Net Worth", latest.net_worth))
                (money_card("assets-card", "Assets", latest.assets_total))
                (money_card("liabilities-card", "Liabilities", latest.liabilities_total))
                (card(
                    "change-card",
                    "Change Since Last Month",
                    &change_text,
                    &compact_change,
                    change_class,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::{OffsetDateTime, macros::date};

    use crate::snapshot::MonthlySnapshot;

    use super::{Summary, summary_cards_view};

    fn snapshot(month: time::Date, assets: f64, liabilities: f64) -> MonthlySnapshot {
        MonthlySnapshot {
            month,
            assets_total: assets,
            liabilities_total: liabilities,
            net_worth: assets - liabilities,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn card_value(html: &Html, id: &str) -> String {
        html.select(&Selector::parse(&format!("#{id} p")).unwrap())
            .next()
            .unwrap()
            .text()
            .collect()
    }

    #[test]
    fn no_snapshots_has_no_summary() {
        assert_eq!(Summary::from_snapshots(&[]), None);
    }

    #[test]
    fn single_snapshot_has_no_change() {
        let summary =
            Summary::from_snapshots(&[snapshot(date!(2024 - 01 - 01), 10.0, 0.0)]).unwrap();

        assert_eq!(summary.change, None);
    }

    #[test]
    fn renders_latest_month_and_change() {
        let summary = Summary::from_snapshots(&[
            snapshot(date!(2024 - 01 - 01), 1000.0, 500.0),
            snapshot(date!(2024 - 02 - 01), 1200.0, 450.0),
        ])
        .unwrap();

        let html = Html::parse_fragment(&summary_cards_view(&summary).into_string());

        assert_eq!(card_value(&html, "net-worth-card"), "$750.00");
        assert_eq!(card_value(&html, "assets-card"), "$1,200.00");
        assert_eq!(card_value(&html, "liabilities-card"), "$450.00");
        assert_eq!(card_value(&html, "change-card"), "+$250.00");
    }

    #[test]
    fn negative_change_has_minus_sign() {
        let summary = Summary::from_snapshots(&[
            snapshot(date!(2024 - 01 - 01), 1000.0, 0.0),
            snapshot(date!(2024 - 02 - 01), 900.0, 0.0),
        ])
        .unwrap();

        let html = Html::parse_fragment(&summary_cards_view(&summary).into_string());

        assert_eq!(card_value(&html, "change-card"), "-$100.00");
    }

    #[test]
    fn change_that_rounds_to_zero_has_no_sign() {
        let summary = Summary::from_snapshots(&[
            snapshot(date!(2024 - 01 - 01), 1000.0, 0.0),
            snapshot(date!(2024 - 02 - 01), 1000.004, 0.0),
        ])
        .unwrap();

        let html = Html::parse_fragment(&summary_cards_view(&summary).into_string());

        assert_eq!(card_value(&html, "change-card"), "$0.00");
    }

    #[test]
    fn cards_show_compact_values() {
        let summary = Summary::from_snapshots(&[
            snapshot(date!(2024 - 01 - 01), 1_000_000.0, 0.0),
            snapshot(date!(2024 - 02 - 01), 1_250_000.0, 12_345.0),
        ])
        .unwrap();

        let html = Html::parse_fragment(&summary_cards_view(&summary).into_string());
        let compact = |id: &str| -> String {
            html.select(&Selector::parse(&format!("#{id} p.card-compact")).unwrap())
                .next()
                .unwrap()
                .text()
                .collect()
        };

        assert_eq!(compact("assets-card"), "$1.3M");
        assert_eq!(compact("liabilities-card"), "$12K");
        assert_eq!(compact("change-card"), "+$238K");
    }
}

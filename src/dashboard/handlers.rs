//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    dashboard::{
        cards::{Summary, summary_cards_view},
        charts::{
            DashboardChart, assets_liabilities_chart, category_breakdown_chart, charts_script,
            charts_view, net_worth_chart,
        },
    },
    endpoints,
    html::{BUTTON_SECONDARY_STYLE, HeadElement, base, link},
    navigation::NavBar,
    snapshot::{CategoryTotal, MonthlySnapshot, get_category_totals, get_monthly_snapshots},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display a page with an overview of the household's net worth.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let snapshots = get_monthly_snapshots(&connection)
        .inspect_err(|error| tracing::error!("could not get monthly snapshots: {error}"))?;

    let Some(summary) = Summary::from_snapshots(&snapshots) else {
        return Ok(dashboard_no_data_view().into_response());
    };

    let category_totals = get_category_totals(summary.latest.month, &connection)
        .inspect_err(|error| tracing::error!("could not get category totals: {error}"))?;

    let charts = build_dashboard_charts(&snapshots, &summary.latest, &category_totals);

    Ok(dashboard_view(&summary, &charts).into_response())
}

fn build_dashboard_charts(
    snapshots: &[MonthlySnapshot],
    latest: &MonthlySnapshot,
    category_totals: &[CategoryTotal],
) -> [DashboardChart; 3] {
    [
        DashboardChart {
            id: "net-worth-chart",
            options: net_worth_chart(snapshots).to_string(),
        },
        DashboardChart {
            id: "assets-liabilities-chart",
            options: assets_liabilities_chart(snapshots).to_string(),
        },
        DashboardChart {
            id: "category-chart",
            options: category_breakdown_chart(latest.month, category_totals).to_string(),
        },
    ]
}

/// Renders the dashboard page when no snapshots exist.
fn dashboard_no_data_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let new_account_link = link(endpoints::NEW_ACCOUNT_VIEW, "adding an account");
    let import_link = link(endpoints::IMPORT_VIEW, "importing");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Your net worth will show up here once you record some balances.
                Get started by " (new_account_link) " or by " (import_link) " your data."
            }
        }
    );

    base("Dashboard", &[], &content)
}

fn dashboard_view(summary: &Summary, charts: &[DashboardChart]) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (summary_cards_view(summary))

            (charts_view(charts))

            div class="w-full flex justify-end"
            {
                button
                    type="button"
                    hx-post=(endpoints::REBUILD_SNAPSHOTS)
                    hx-target="#alert-container"
                    hx-target-error="#alert-container"
                    class={"max-w-xs " (BUTTON_SECONDARY_STYLE)}
                {
                    "Rebuild snapshots"
                }
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(charts),
    ];

    base("Dashboard", &scripts, &content)
}

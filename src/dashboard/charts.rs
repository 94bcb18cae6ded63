//! Chart generation and rendering for the dashboard.
//!
//! The charts are ECharts configurations built with charming:
//! - **Net Worth**: net worth at the end of each month
//! - **Assets vs Liabilities**: monthly totals side by side
//! - **Category Breakdown**: the latest month's total per category, with
//!   liabilities shown as negative amounts
//!
//! Every data point carries a tooltip rendered on the server, see
//! [crate::dashboard::tooltip].

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title, VisualMap, VisualMapPiece},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, ItemStyle, JsFunction, Tooltip, Trigger,
    },
    series::{Bar, Line},
};
use maud::{Markup, PreEscaped, html};
use time::Date;

use crate::{
    account::AccountType,
    dashboard::tooltip::{TooltipSeries, create_multi_series_tooltip, create_tooltip},
    format::{DateStyle, format_currency, format_date},
    html::HeadElement,
    snapshot::{CategoryTotal, MonthlySnapshot},
};

const NET_WORTH_COLOR: &str = "#3b82f6";
const ASSETS_COLOR: &str = "#22c55e";
const LIABILITIES_COLOR: &str = "#ef4444";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id,
                escape_script_text(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Stop text from closing the surrounding `<script>` element.
///
/// `</` only appears inside string literals in the chart options, where
/// `<\/` reads back as the same text.
fn escape_script_text(text: &str) -> String {
    text.replace("</", "<\\/")
}

fn month_labels(snapshots: &[MonthlySnapshot]) -> Vec<String> {
    snapshots
        .iter()
        .map(|snapshot| format_date(snapshot.month, DateStyle::MonthYear))
        .collect()
}

pub(super) fn net_worth_chart(snapshots: &[MonthlySnapshot]) -> Chart {
    let labels = month_labels(snapshots);
    let values: Vec<f64> = snapshots.iter().map(|snapshot| snapshot.net_worth).collect();
    let tooltips: Vec<String> = labels
        .iter()
        .zip(&values)
        .map(|(label, value)| {
            create_tooltip(label, "Net Worth", &format_currency(*value), NET_WORTH_COLOR)
                .into_string()
        })
        .collect();

    Chart::new()
        .title(Title::new().text("Net Worth").subtext("End of each month"))
        .tooltip(embedded_tooltip(Trigger::Axis, &tooltips))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Line::new()
                .name("Net Worth")
                .item_style(ItemStyle::new().color(NET_WORTH_COLOR))
                .data(values),
        )
}

pub(super) fn assets_liabilities_chart(snapshots: &[MonthlySnapshot]) -> Chart {
    let labels = month_labels(snapshots);
    let tooltips: Vec<String> = labels
        .iter()
        .zip(snapshots)
        .map(|(label, snapshot)| {
            let assets = format_currency(snapshot.assets_total);
            let liabilities = format_currency(snapshot.liabilities_total);

            create_multi_series_tooltip(
                label,
                &[
                    TooltipSeries {
                        label: "Assets",
                        value: &assets,
                        color: ASSETS_COLOR,
                    },
                    TooltipSeries {
                        label: "Liabilities",
                        value: &liabilities,
                        color: LIABILITIES_COLOR,
                    },
                ],
            )
            .into_string()
        })
        .collect();

    Chart::new()
        .title(Title::new().text("Assets vs Liabilities").left(20).top("1%"))
        .tooltip(embedded_tooltip(Trigger::Axis, &tooltips))
        .legend(Legend::new().left(250).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(70)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Bar::new()
                .name("Assets")
                .item_style(ItemStyle::new().color(ASSETS_COLOR))
                .data(
                    snapshots
                        .iter()
                        .map(|snapshot| snapshot.assets_total)
                        .collect::<Vec<_>>(),
                ),
        )
        .series(
            Bar::new()
                .name("Liabilities")
                .item_style(ItemStyle::new().color(LIABILITIES_COLOR))
                .data(
                    snapshots
                        .iter()
                        .map(|snapshot| snapshot.liabilities_total)
                        .collect::<Vec<_>>(),
                ),
        )
}

/// The signed contribution of a category to net worth.
fn signed_total(total: &CategoryTotal) -> f64 {
    match total.account_type {
        AccountType::Asset => total.total,
        AccountType::Liability => -total.total,
    }
}

pub(super) fn category_breakdown_chart(month: Date, totals: &[CategoryTotal]) -> Chart {
    let month_label = format_date(month, DateStyle::MonthYear);
    let labels: Vec<String> = totals
        .iter()
        .map(|total| total.category_name.clone())
        .collect();
    let values: Vec<f64> = totals.iter().map(signed_total).collect();
    let tooltips: Vec<String> = totals
        .iter()
        .map(|total| {
            let color = match total.account_type {
                AccountType::Asset => ASSETS_COLOR,
                AccountType::Liability => LIABILITIES_COLOR,
            };

            create_tooltip(
                &month_label,
                &format!("{} ({})", total.category_name, total.account_type.label()),
                &format_currency(total.total),
                color,
            )
            .into_string()
        })
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("By Category")
                .subtext(format!("As of {month_label}")),
        )
        .tooltip(embedded_tooltip(Trigger::Axis, &tooltips))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .visual_map(VisualMap::new().show(false).pieces(vec![
            VisualMapPiece::new().lte(-1).color(LIABILITIES_COLOR),
            VisualMapPiece::new().gte(0).color(ASSETS_COLOR),
        ]))
        .series(Bar::new().name("Total").data(values))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD',
              notation: 'compact'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// A tooltip that shows the pre-rendered HTML in `tooltips` for the hovered data point.
fn embedded_tooltip(trigger: Trigger, tooltips: &[String]) -> Tooltip {
    let tooltips_json = serde_json::to_string(tooltips).unwrap_or_else(|error| {
        tracing::error!("could not serialize chart tooltips: {error}");
        "[]".to_owned()
    });

    Tooltip::new()
        .trigger(trigger)
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
        .formatter(JsFunction::new_with_args(
            "params",
            &format!(
                "const tooltips = {tooltips_json};
                const point = Array.isArray(params) ? params[0] : params;
                return point ? (tooltips[point.dataIndex] || '') : '';"
            ),
        ))
}

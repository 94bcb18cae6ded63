//! HTML for the chart tooltips shown when hovering a data point.
//!
//! The markup is rendered on the server and embedded in the chart options,
//! one tooltip per data point.

use maud::{Markup, html};

/// One row of a tooltip: a colored dot, a label and a formatted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipSeries<'a> {
    pub label: &'a str,
    pub value: &'a str,
    /// A CSS color for the dot, e.g. "#3b82f6".
    pub color: &'a str,
}

fn tooltip_row(series: &TooltipSeries) -> Markup {
    html!(
        div class="chart-tooltip-row"
        {
            span class="chart-tooltip-dot" style=(format!("background: {}", series.color)) {}
            span class="chart-tooltip-label" { (series.label) }
            span class="chart-tooltip-value" { (series.value) }
        }
    )
}

/// A tooltip for a chart with a single series.
pub fn create_tooltip(date: &str, label: &str, value: &str, color: &str) -> Markup {
    create_multi_series_tooltip(
        date,
        &[TooltipSeries {
            label,
            value,
            color,
        }],
    )
}

/// A tooltip with one row per entry in `series`, in order.
pub fn create_multi_series_tooltip(date: &str, series: &[TooltipSeries]) -> Markup {
    html!(
        div class="chart-tooltip"
        {
            div class="chart-tooltip-header" { (date) }

            @for entry in series {
                (tooltip_row(entry))
            }
        }
    )
}

//! Dashboard module
//!
//! Provides an overview page with the household's net worth over time,
//! built from the monthly snapshots.

mod cards;
mod charts;
mod handlers;
mod tooltip;

pub use handlers::get_dashboard_page;
pub use tooltip::{TooltipSeries, create_multi_series_tooltip, create_tooltip};

//! Monthly snapshots of the household's assets, liabilities and net worth.
//!
//! Snapshots are derived from the account balances and are recomputed
//! whenever a balance, or anything that changes how a balance is counted,
//! changes.

mod core;
mod month;
mod rebuild_endpoint;

pub use core::{
    CategoryTotal, MonthlySnapshot, create_snapshot_tables, get_category_totals,
    get_monthly_snapshots, rebuild_all_snapshots, refresh_snapshots_from, take_snapshot,
};
pub use month::{month_end, month_start};
pub use rebuild_endpoint::rebuild_snapshots_endpoint;

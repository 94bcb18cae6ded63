//! Endpoint for recomputing every monthly snapshot on demand.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, alert::Alert, snapshot::rebuild_all_snapshots, timezone::local_today,
};

/// The state needed for rebuilding the snapshots.
#[derive(Debug, Clone)]
pub struct RebuildSnapshotsState {
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RebuildSnapshotsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Recompute all snapshots from the balances, responding with an alert.
pub async fn rebuild_snapshots_endpoint(State(state): State<RebuildSnapshotsState>) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match rebuild_all_snapshots(today, &connection) {
        Ok(count) => Alert::SuccessSimple {
            message: format!("Rebuilt snapshots for {count} months"),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("could not rebuild snapshots: {error}");
            error.into_alert_response()
        }
    }
}

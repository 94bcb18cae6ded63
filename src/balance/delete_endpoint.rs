//! Defines the endpoint for deleting an account balance.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    balance::{BalanceId, delete_balance},
    db::with_transaction,
    snapshot::refresh_snapshots_from,
    timezone::local_today,
};

/// The state needed to delete an account balance.
#[derive(Debug, Clone)]
pub struct DeleteBalanceState {
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteBalanceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an account balance, responds with an alert.
pub async fn delete_balance_endpoint(
    Path(balance_id): Path<BalanceId>,
    State(state): State<DeleteBalanceState>,
) -> Response {
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

    let result = with_transaction(&connection, |connection| {
        let balance = delete_balance(balance_id, connection)?;
        refresh_snapshots_from(balance.date, today, connection)?;
        Ok(balance)
    });

    match result {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(_) => Alert::SuccessSimple {
            message: "Balance deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error @ Error::DeleteMissingBalance) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete balance {balance_id}: {error}");
            error.into_alert_response()
        }
    }
}

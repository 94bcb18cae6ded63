//! Defines the endpoint for recording an account balance.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::AccountId,
    balance::upsert_balance,
    db::with_transaction,
    endpoints,
    format::parse_local_date,
    snapshot::refresh_snapshots_from,
    timezone::local_today,
};

/// The state needed to record an account balance.
#[derive(Debug, Clone)]
pub struct CreateBalanceState {
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBalanceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for recording an account balance.
#[derive(Debug, Deserialize)]
pub struct BalanceForm {
    /// The day the balance was checked as `YYYY-MM-DD`.
    pub date: String,
    /// The balance in dollars.
    pub value: f64,
}

/// A route handler for recording the balance of an account on a day,
/// redirects to the account page on success.
///
/// A balance for the same account and day is replaced, which is how the
/// balance dialog on the account page edits a balance.
pub async fn create_balance_endpoint(
    Path(account_id): Path<AccountId>,
    State(state): State<CreateBalanceState>,
    Form(form): Form<BalanceForm>,
) -> Response {
    let date = match parse_local_date(&form.date) {
        Ok(date) => date,
        Err(error) => return error.into_alert_response(),
    };

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
        let balance = upsert_balance(account_id, date, form.value, connection)?;
        refresh_snapshots_from(date, today, connection)?;
        Ok(balance)
    });

    match result {
        Ok(balance) => {
            tracing::info!(
                "Recorded balance {} for account {account_id} on {}",
                balance.value,
                balance.date
            );

            (
                HxRedirect(endpoints::format_endpoint(
                    endpoints::ACCOUNT_VIEW,
                    account_id,
                )),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error @ Error::InvalidAccount) => error.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "Could not record balance {form:?} for account {account_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

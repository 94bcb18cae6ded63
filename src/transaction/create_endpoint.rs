//! Defines the endpoint for adding a transaction to an account.

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
    endpoints,
    format::parse_local_date,
    transaction::{Transaction, upsert_transaction},
};

/// The state needed for adding a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for adding a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The day of the transaction as `YYYY-MM-DD`.
    pub date: String,
    /// The amount in dollars, negative for money going out.
    pub amount: f64,
    #[serde(default)]
    pub description: String,
}

/// A route handler for adding a transaction to an account, redirects to the
/// account page on success.
pub async fn create_transaction_endpoint(
    Path(account_id): Path<AccountId>,
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let date = match parse_local_date(&form.date) {
        Ok(date) => date,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let transaction = Transaction::build(account_id, date, form.amount).description(&form.description);

    match upsert_transaction(transaction, &connection) {
        Ok(transaction) => {
            tracing::info!(
                "Created transaction {} for account {account_id}",
                transaction.id
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
                "Could not create transaction {form:?} for account {account_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

//! Defines the endpoint for updating an account.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{AccountId, NewAccount, form::AccountFormData, get_account, update_account},
    category::get_category,
    db::with_transaction,
    endpoints,
    snapshot::rebuild_all_snapshots,
    timezone::local_today,
};

/// The state needed to edit an account.
#[derive(Debug, Clone)]
pub struct EditAccountState {
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating an account, redirects to the account page on success.
///
/// The account type is derived from the new category. Moving an account to
/// another category changes how its balances are counted, so the snapshots
/// are rebuilt when that happens.
pub async fn update_account_endpoint(
    Path(account_id): Path<AccountId>,
    State(state): State<EditAccountState>,
    Form(form): Form<AccountFormData>,
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
        let current = get_account(account_id, connection).map_err(|error| match error {
            Error::NotFound => Error::UpdateMissingAccount,
            error => error,
        })?;
        let category = get_category(form.category_id, connection).map_err(|error| match error {
            Error::NotFound => Error::InvalidCategory,
            error => error,
        })?;
        let changes = NewAccount::new(&form.name, &form.bank, &category, form.owner)?;

        update_account(account_id, &changes, connection)?;

        if current.category_id != changes.category_id
            || current.account_type != changes.account_type
        {
            rebuild_all_snapshots(today, connection)?;
        }

        Ok(())
    });

    match result {
        Ok(()) => (
            HxRedirect(endpoints::format_endpoint(
                endpoints::ACCOUNT_VIEW,
                account_id,
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(
            error @ (Error::EmptyAccountName | Error::InvalidCategory | Error::UpdateMissingAccount),
        ) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not update account {account_id}: {error}");
            error.into_alert_response()
        }
    }
}

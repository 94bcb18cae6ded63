//! Defines the endpoint for creating a new account.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{NewAccount, create_account, form::AccountFormData},
    category::get_category,
    endpoints,
};

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new account, redirects to the accounts page on success.
///
/// The account type is derived from the category.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    Form(form): Form<AccountFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = get_category(form.category_id, &connection)
        .map_err(|error| match error {
            Error::NotFound => Error::InvalidCategory,
            error => error,
        })
        .and_then(|category| NewAccount::new(&form.name, &form.bank, &category, form.owner))
        .and_then(|account| create_account(account, &connection));

    match result {
        Ok(account) => {
            tracing::info!(
                "Created {} account {} ({})",
                account.account_type,
                account.name,
                account.id
            );

            (
                HxRedirect(endpoints::ACCOUNTS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error @ (Error::EmptyAccountName | Error::InvalidCategory)) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("Could not create account with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

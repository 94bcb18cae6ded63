//! Defines the route handler for the page for creating an account.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::form::{AccountFormValues, FormMethod, account_form_view},
    category::{Category, get_all_categories},
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    profile::{Profile, get_profile},
};

/// The state needed for the create and edit account pages.
#[derive(Debug, Clone)]
pub struct AccountFormPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountFormPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for creating an account.
pub async fn get_new_account_page(
    State(state): State<AccountFormPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;
    let profile = get_profile(&connection)
        .inspect_err(|error| tracing::error!("could not get profile: {error}"))?;

    Ok(new_account_view(&categories, &profile).into_response())
}

fn new_account_view(categories: &[Category], profile: &Profile) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_ACCOUNT_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="w-full mb-4 text-xl font-bold" { "New Account" }

            @if categories.is_empty() {
                p
                {
                    "Accounts need a category. "
                    (link(endpoints::NEW_CATEGORY_VIEW, "Create a category"))
                    " first."
                }
            } @else {
                (account_form_view(
                    FormMethod::Post,
                    endpoints::POST_ACCOUNT,
                    "Create Account",
                    &AccountFormValues::default(),
                    categories,
                    profile,
                ))
            }
        }
    };

    base("Create Account", &[], &content)
}

//! Defines the route handler for the page for editing an account.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    Error,
    account::{
        AccountId,
        create_page::AccountFormPageState,
        form::{AccountFormValues, FormMethod, account_form_view},
        get_account,
    },
    category::get_all_categories,
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    profile::get_profile,
};

/// Renders the page for editing an account.
pub async fn get_edit_account_page(
    Path(account_id): Path<AccountId>,
    State(state): State<AccountFormPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account = get_account(account_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve account {account_id}: {error}");
        }
    })?;
    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;
    let profile = get_profile(&connection)
        .inspect_err(|error| tracing::error!("could not get profile: {error}"))?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_ACCOUNT, account_id);
    let account_page = endpoints::format_endpoint(endpoints::ACCOUNT_VIEW, account_id);

    let values = AccountFormValues {
        name: account.name.as_ref(),
        bank: &account.bank,
        category_id: Some(account.category_id),
        owner: account.owner,
    };

    let nav_bar = NavBar::new(&edit_endpoint).into_html();
    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="w-full mb-4 text-xl font-bold" { "Edit " (account.name) }

            (account_form_view(
                FormMethod::Put,
                &update_endpoint,
                "Save Account",
                &values,
                &categories,
                &profile,
            ))

            p class="w-full mt-4" { (link(&account_page, "Back to account")) }
        }
    };

    Ok(base("Edit Account", &[], &content).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        account::{NewAccount, create_account, create_page::AccountFormPageState},
        category::{CategoryName, create_category},
        endpoints,
        profile::OwnerType,
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_status_ok,
            assert_valid_html, get_test_state, must_get_form, parse_html_document,
        },
    };

    use super::get_edit_account_page;

    #[tokio::test]
    async fn render_page_with_account_values() {
        let state = get_test_state();
        let account = {
            let connection = state.db_connection.lock().unwrap();
            let category =
                create_category(CategoryName::new_unchecked("Savings"), &connection).unwrap();
            create_account(
                NewAccount::new("Rainy day", "ANZ", &category, OwnerType::Me).unwrap(),
                &connection,
            )
            .unwrap()
        };

        let response = get_edit_account_page(
            Path(account.id),
            State(AccountFormPageState {
                db_connection: state.db_connection.clone(),
            }),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::PUT_ACCOUNT, account.id),
            "hx-put",
        );
        assert_form_input_with_value(&form, "name", "text", "Rainy day");
        assert_form_input_with_value(&form, "bank", "text", "ANZ");
    }

    #[tokio::test]
    async fn missing_account_is_not_found() {
        let state = get_test_state();

        let response = get_edit_account_page(
            Path(5),
            State(AccountFormPageState {
                db_connection: state.db_connection.clone(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

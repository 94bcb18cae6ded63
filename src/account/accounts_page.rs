//! Displays accounts with their latest balances, filters and the delete dialog.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::{
        AccountId,
        filters::{
            AccountFilters, AccountItem, SelectOption, bank_options, category_options,
            owner_options,
        },
        get_all_accounts,
    },
    balance::get_latest_balances,
    category::get_all_categories,
    endpoints::{self, format_endpoint},
    format::format_currency,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, modal_dialog,
    },
    modal::ModalState,
    navigation::NavBar,
    profile::get_profile,
};

/// The state needed for the [get_accounts_page](crate::account::get_accounts_page) route handler.
#[derive(Debug, Clone)]
pub struct AccountsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters that open a dialog on the accounts page.
#[derive(Debug, Default, Deserialize)]
pub struct AccountsModalQuery {
    /// The account to ask for confirmation before deleting.
    pub delete: Option<AccountId>,
}

/// Render the accounts page.
pub async fn get_accounts_page(
    State(state): State<AccountsPageState>,
    Query(filters): Query<AccountFilters>,
    Query(modal_query): Query<AccountsModalQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve accounts: {error}"))?;
    let category_names: HashMap<_, _> = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?
        .into_iter()
        .map(|category| (category.id, category.name.to_string()))
        .collect();
    let balances = get_latest_balances(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve latest balances: {error}"))?;
    let profile = get_profile(&connection)
        .inspect_err(|error| tracing::error!("could not get profile: {error}"))?;

    let items: Vec<AccountItem> = accounts
        .iter()
        .map(|account| {
            let category = category_names
                .get(&account.category_id)
                .map(String::as_str)
                .unwrap_or_default();

            AccountItem::new(
                account,
                category,
                balances.get(&account.id).copied(),
                &profile,
            )
        })
        .collect();

    // Asking to delete an account that no longer exists shows the page without the dialog.
    let delete_modal: ModalState<&AccountItem> = modal_query
        .delete
        .and_then(|id| items.iter().find(|item| item.id == id))
        .into();

    Ok(accounts_view(&items, &filters, &delete_modal).into_response())
}

fn accounts_view(
    items: &[AccountItem],
    filters: &AccountFilters,
    delete_modal: &ModalState<&AccountItem>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();
    let visible = filters.apply(items);
    let query_string = filters.to_query_string();

    let page_url = if query_string.is_empty() {
        endpoints::ACCOUNTS_VIEW.to_owned()
    } else {
        format!("{}?{query_string}", endpoints::ACCOUNTS_VIEW)
    };
    let delete_link = |id: AccountId| {
        if query_string.is_empty() {
            format!("{}?delete={id}", endpoints::ACCOUNTS_VIEW)
        } else {
            format!("{}?{query_string}&delete={id}", endpoints::ACCOUNTS_VIEW)
        }
    };

    let table_row = |item: &AccountItem| {
        let account_url = format_endpoint(endpoints::ACCOUNT_VIEW, item.id);
        let edit_url = format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, item.id);

        html!(
            tr class=(TABLE_ROW_STYLE) data-account-id=(item.id)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    a href=(account_url) class=(LINK_STYLE) { (item.name) }
                }

                td class=(TABLE_CELL_STYLE) { (item.bank) }

                td class=(TABLE_CELL_STYLE) { (item.category) }

                td class=(TABLE_CELL_STYLE) { (item.account_type.label()) }

                td class=(TABLE_CELL_STYLE)
                {
                    span class=(item.owner_color.badge_style()) { (item.owner) }
                }

                td class="px-6 py-4 text-right"
                {
                    @match item.balance {
                        Some(balance) => { (format_currency(balance)) }
                        None => { span class="text-gray-400" { "No balance" } }
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                        a href=(delete_link(item.id)) class=(BUTTON_DELETE_STYLE) { "Delete" }
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Accounts" }

                    a href=(endpoints::NEW_ACCOUNT_VIEW) class=(LINK_STYLE)
                    {
                        "Add Account"
                    }
                }

                (filter_form_view(items, filters))

                p id="account-count" class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Showing " (visible.len()) " of " (items.len()) " accounts"
                }

                section class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Bank" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Owner" }
                                th scope="col" class="px-6 py-3 text-right" { "Balance" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for &item in &visible {
                                (table_row(item))
                            }

                            @if items.is_empty() {
                                tr
                                {
                                    td colspan="7" class="px-6 py-4 text-center"
                                    {
                                        "No accounts yet. "
                                        a href=(endpoints::NEW_ACCOUNT_VIEW) class=(LINK_STYLE)
                                        {
                                            "Add your first account"
                                        }
                                        "."
                                    }
                                }
                            } @else if visible.is_empty() {
                                tr
                                {
                                    td colspan="7" class="px-6 py-4 text-center"
                                    {
                                        "No accounts match the filters."
                                    }
                                }
                            }
                        }
                    }
                }
            }

            @if let Some(item) = delete_modal.data().filter(|_| delete_modal.is_open()) {
                (delete_dialog_view(item, &page_url))
            }
        }
    );

    base("Accounts", &[], &content)
}

fn multi_select(name: &str, label: &str, options: &[SelectOption], selected: &[String]) -> Markup {
    html!(
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select id=(name) name=(name) multiple class=(FORM_TEXT_INPUT_STYLE)
            {
                @for option in options {
                    option
                        value=(option.value)
                        selected[selected.contains(&option.value)]
                    {
                        (option.label)
                    }
                }
            }
        }
    )
}

fn filter_form_view(items: &[AccountItem], filters: &AccountFilters) -> Markup {
    html!(
        form
            method="get"
            action=(endpoints::ACCOUNTS_VIEW)
            class="grid gap-4 md:grid-cols-5 items-end"
        {
            div
            {
                label for="search" class=(FORM_LABEL_STYLE) { "Search" }

                input
                    id="search"
                    type="search"
                    name="search"
                    placeholder="Name or bank"
                    value=(filters.search)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (multi_select("category", "Category", &category_options(items), &filters.category))
            (multi_select("owner", "Owner", &owner_options(items), &filters.owner))
            (multi_select("bank", "Bank", &bank_options(items), &filters.bank))

            div class="flex gap-4 items-center"
            {
                button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Filter" }

                @if filters.is_active() {
                    a href=(endpoints::ACCOUNTS_VIEW) class=(LINK_STYLE) { "Reset" }
                }
            }
        }
    )
}

fn delete_dialog_view(item: &AccountItem, close_url: &str) -> Markup {
    let delete_url = format_endpoint(endpoints::DELETE_ACCOUNT, item.id);

    let body = html!(
        p class="mb-4"
        {
            "Delete the account " strong { (item.name) } "? "
            "All of its balances and transactions will be deleted too. This cannot be undone."
        }

        div class="flex justify-end gap-4"
        {
            a href=(close_url) class=(LINK_STYLE) { "Cancel" }

            button
                type="button"
                hx-delete=(delete_url)
                hx-target-error="#alert-container"
                class=(BUTTON_DELETE_STYLE)
            {
                "Delete"
            }
        }
    );

    modal_dialog("delete-account-dialog", "Delete account", close_url, &body)
}

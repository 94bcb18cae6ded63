//! The page for a single account: its details, balance history and transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    account::{
        Account, AccountId,
        form_options::{owner_color, owner_label},
        get_account,
    },
    balance::{Balance, BalanceId, get_balances_for_account},
    category::get_category,
    endpoints::{self, format_endpoint},
    format::{DateStyle, format_currency, format_date},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, dollar_input_styles, modal_dialog,
    },
    modal::ModalState,
    navigation::NavBar,
    profile::{Profile, get_profile},
    timezone::local_today,
    transaction::{Transaction, get_transactions_for_account},
};

/// The state needed for the account page.
#[derive(Debug, Clone)]
pub struct AccountPageState {
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters that open a dialog on the account page.
#[derive(Debug, Default, Deserialize)]
pub struct AccountPageQuery {
    /// The balance to edit.
    pub edit_balance: Option<BalanceId>,
}

/// Render the page for a single account.
pub async fn get_account_page(
    Path(account_id): Path<AccountId>,
    State(state): State<AccountPageState>,
    Query(query): Query<AccountPageQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

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
    let category = get_category(account.category_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve category: {error}"))?;
    let profile = get_profile(&connection)
        .inspect_err(|error| tracing::error!("could not get profile: {error}"))?;
    let balances = get_balances_for_account(account_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve balances: {error}"))?;
    let transactions = get_transactions_for_account(account_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve transactions: {error}"))?;

    let edit_modal: ModalState<&Balance> = query
        .edit_balance
        .and_then(|id| balances.iter().find(|balance| balance.id == id))
        .into();

    let page = AccountPage {
        account: &account,
        category_name: category.name.as_ref(),
        profile: &profile,
        balances: &balances,
        transactions: &transactions,
        today,
    };

    Ok(page.view(&edit_modal).into_response())
}

struct AccountPage<'a> {
    account: &'a Account,
    category_name: &'a str,
    profile: &'a Profile,
    balances: &'a [Balance],
    transactions: &'a [Transaction],
    today: Date,
}

impl AccountPage<'_> {
    fn view(&self, edit_modal: &ModalState<&Balance>) -> Markup {
        let account = self.account;
        let account_url = format_endpoint(endpoints::ACCOUNT_VIEW, account.id);
        let edit_url = format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account.id);
        let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();
        let latest = self.balances.first();

        let content = html!(
            (nav_bar)

            main class=(PAGE_CONTAINER_STYLE)
            {
                section class="space-y-2"
                {
                    header class="flex justify-between flex-wrap items-end"
                    {
                        h1 class="text-xl font-bold" { (account.name) }

                        a href=(edit_url) class=(LINK_STYLE) { "Edit Account" }
                    }

                    dl id="account-details" class="grid grid-cols-2 gap-x-4 gap-y-1 text-sm md:grid-cols-4"
                    {
                        dt class="font-medium" { "Bank" }
                        dd { @if account.bank.is_empty() { "-" } @else { (account.bank) } }
                        dt class="font-medium" { "Category" }
                        dd { (self.category_name) }
                        dt class="font-medium" { "Type" }
                        dd { (account.account_type.label()) }
                        dt class="font-medium" { "Owner" }
                        dd
                        {
                            span class=(owner_color(account.owner, self.profile).badge_style())
                            {
                                (owner_label(account.owner, self.profile))
                            }
                        }
                    }

                    p id="latest-balance" class="text-2xl font-semibold"
                    {
                        @match latest {
                            Some(balance) => {
                                (format_currency(balance.value))
                                span class="ml-2 text-sm font-normal text-gray-500"
                                {
                                    "as of " (format_date(balance.date, DateStyle::MediumDate))
                                }
                            }
                            None => { "No balance recorded" }
                        }
                    }
                }

                section class="mt-8 grid gap-8 lg:grid-cols-2"
                {
                    (self.balances_view())
                    (self.transactions_view())
                }

                @if let Some(balance) = edit_modal.data().filter(|_| edit_modal.is_open()) {
                    (edit_balance_dialog(account.id, balance, &account_url))
                }
            }
        );

        base(account.name.as_ref(), &[dollar_input_styles()], &content)
    }

    fn balances_view(&self) -> Markup {
        let account_id = self.account.id;
        let post_url = format_endpoint(endpoints::POST_BALANCE, account_id);
        let account_url = format_endpoint(endpoints::ACCOUNT_VIEW, account_id);

        html!(
            section id="balances" class="space-y-4"
            {
                h2 class="text-lg font-semibold" { "Balances" }

                form
                    hx-post=(post_url)
                    hx-target-error="#alert-container"
                    class="grid gap-4 md:grid-cols-3 items-end"
                {
                    div
                    {
                        label for="balance-date" class=(FORM_LABEL_STYLE) { "Date" }

                        input
                            id="balance-date"
                            name="date"
                            type="date"
                            required
                            value=(self.today)
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="balance-value" class=(FORM_LABEL_STYLE) { "Balance" }

                        div class="input-wrapper w-full"
                        {
                            input
                                id="balance-value"
                                name="value"
                                type="number"
                                step="0.01"
                                placeholder="0.00"
                                required
                                class=(FORM_TEXT_INPUT_STYLE);
                        }
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Balance" }
                }

                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class="px-6 py-3 text-right" { "Balance" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for balance in self.balances {
                            tr class=(TABLE_ROW_STYLE) data-balance-id=(balance.id)
                            {
                                td class=(TABLE_CELL_STYLE)
                                {
                                    time datetime=(balance.date)
                                    {
                                        (format_date(balance.date, DateStyle::MediumDate))
                                    }
                                }

                                td class="px-6 py-4 text-right" { (format_currency(balance.value)) }

                                td class=(TABLE_CELL_STYLE)
                                {
                                    div class="flex gap-4"
                                    {
                                        a
                                            href=(format!("{account_url}?edit_balance={}", balance.id))
                                            class=(LINK_STYLE)
                                        {
                                            "Edit"
                                        }

                                        button
                                            type="button"
                                            hx-delete=(format_endpoint(endpoints::DELETE_BALANCE, balance.id))
                                            hx-confirm="Are you sure you want to delete this balance?"
                                            hx-target="closest tr"
                                            hx-target-error="#alert-container"
                                            hx-swap="delete"
                                            class=(BUTTON_DELETE_STYLE)
                                        {
                                            "Delete"
                                        }
                                    }
                                }
                            }
                        }

                        @if self.balances.is_empty() {
                            tr
                            {
                                td colspan="3" class="px-6 py-4 text-center" { "No balances yet." }
                            }
                        }
                    }
                }
            }
        )
    }

    fn transactions_view(&self) -> Markup {
        let post_url = format_endpoint(endpoints::POST_TRANSACTION, self.account.id);

        html!(
            section id="transactions" class="space-y-4"
            {
                h2 class="text-lg font-semibold" { "Transactions" }

                form
                    hx-post=(post_url)
                    hx-target-error="#alert-container"
                    class="grid gap-4 md:grid-cols-4 items-end"
                {
                    div
                    {
                        label for="transaction-date" class=(FORM_LABEL_STYLE) { "Date" }

                        input
                            id="transaction-date"
                            name="date"
                            type="date"
                            required
                            value=(self.today)
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="transaction-amount" class=(FORM_LABEL_STYLE) { "Amount" }

                        div class="input-wrapper w-full"
                        {
                            input
                                id="transaction-amount"
                                name="amount"
                                type="number"
                                step="0.01"
                                placeholder="0.00"
                                required
                                class=(FORM_TEXT_INPUT_STYLE);
                        }
                    }

                    div
                    {
                        label for="transaction-description" class=(FORM_LABEL_STYLE) { "Description" }

                        input
                            id="transaction-description"
                            name="description"
                            type="text"
                            placeholder="Description"
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Transaction" }
                }

                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class="px-6 py-3 text-right" { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for transaction in self.transactions {
                            tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
                            {
                                td class=(TABLE_CELL_STYLE)
                                {
                                    time datetime=(transaction.date)
                                    {
                                        (format_date(transaction.date, DateStyle::MediumDate))
                                    }
                                }

                                td class=(TABLE_CELL_STYLE) { (transaction.description) }

                                td class="px-6 py-4 text-right" { (format_currency(transaction.amount)) }

                                td class=(TABLE_CELL_STYLE)
                                {
                                    button
                                        type="button"
                                        hx-delete=(format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id))
                                        hx-confirm="Are you sure you want to delete this transaction?"
                                        hx-target="closest tr"
                                        hx-target-error="#alert-container"
                                        hx-swap="delete"
                                        class=(BUTTON_DELETE_STYLE)
                                    {
                                        "Delete"
                                    }
                                }
                            }
                        }

                        @if self.transactions.is_empty() {
                            tr
                            {
                                td colspan="4" class="px-6 py-4 text-center" { "No transactions yet." }
                            }
                        }
                    }
                }
            }
        )
    }
}

/// The dialog for changing the value of an existing balance.
///
/// The date is read-only since a balance is identified by its account and date.
fn edit_balance_dialog(account_id: AccountId, balance: &Balance, close_url: &str) -> Markup {
    let post_url = format_endpoint(endpoints::POST_BALANCE, account_id);

    let body = html!(
        form
            hx-post=(post_url)
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            div
            {
                label for="edit-balance-date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    id="edit-balance-date"
                    name="date"
                    type="date"
                    readonly
                    value=(balance.date)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="edit-balance-value" class=(FORM_LABEL_STYLE) { "Balance" }

                div class="input-wrapper w-full"
                {
                    input
                        id="edit-balance-value"
                        name="value"
                        type="number"
                        step="0.01"
                        required
                        autofocus
                        value=(balance.value)
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div class="flex justify-end gap-4 items-center"
            {
                a href=(close_url) class=(LINK_STYLE) { "Cancel" }
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
            }
        }
    );

    modal_dialog("edit-balance-dialog", "Edit balance", close_url, &body)
}

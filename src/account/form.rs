//! The form shared by the create and edit account pages.

use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    account::form_options::{OwnerOption, category_options, owner_label, owner_options},
    category::{Category, CategoryId, LIABILITY_CATEGORIES},
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    profile::{OwnerType, Profile},
};

/// The form data for creating or updating an account.
#[derive(Debug, Deserialize)]
pub struct AccountFormData {
    pub name: String,
    #[serde(default)]
    pub bank: String,
    pub category_id: CategoryId,
    pub owner: OwnerType,
}

/// The values to fill the account form with.
pub struct AccountFormValues<'a> {
    pub name: &'a str,
    pub bank: &'a str,
    pub category_id: Option<CategoryId>,
    pub owner: OwnerType,
}

impl Default for AccountFormValues<'_> {
    fn default() -> Self {
        Self {
            name: "",
            bank: "",
            category_id: None,
            owner: OwnerType::Me,
        }
    }
}

/// How the account form is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Post,
    Put,
}

/// Render the account form that submits to `endpoint`.
pub fn account_form_view(
    method: FormMethod,
    endpoint: &str,
    submit_label: &str,
    values: &AccountFormValues,
    categories: &[Category],
    profile: &Profile,
) -> Markup {
    let mut owners = owner_options(profile);

    // An account can belong to the spouse after the spouse's name is cleared.
    if !owners.iter().any(|option| option.value == values.owner) {
        owners.push(OwnerOption {
            value: values.owner,
            label: owner_label(values.owner, profile),
        });
    }

    let selected_category = values.category_id.map(|id| id.to_string());

    let fields = html! {
        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Account Name" }

            input
                id="name"
                type="text"
                name="name"
                placeholder="e.g. Everyday, Rainy day fund, Home loan"
                value=(values.name)
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="bank" class=(FORM_LABEL_STYLE) { "Bank" }

            input
                id="bank"
                type="text"
                name="bank"
                placeholder="e.g. ANZ"
                value=(values.bank)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

            select id="category_id" name="category_id" required class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" disabled selected[selected_category.is_none()] { "Choose a category" }

                @for option in category_options(categories) {
                    option
                        value=(option.value)
                        selected[selected_category.as_deref() == Some(option.value.as_str())]
                    {
                        (option.label)
                    }
                }
            }

            p class="mt-2 text-xs text-gray-500 dark:text-gray-400"
            {
                "Accounts in categories containing "
                (LIABILITY_CATEGORIES.join(", "))
                " are counted as liabilities."
            }
        }

        div
        {
            label for="owner" class=(FORM_LABEL_STYLE) { "Owner" }

            select id="owner" name="owner" required class=(FORM_TEXT_INPUT_STYLE)
            {
                @for option in &owners {
                    option
                        value=(option.value.as_str())
                        selected[option.value == values.owner]
                    {
                        (option.label)
                    }
                }
            }
        }
    };

    let submit_button = html! {
        button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
        {
            (submit_label)
        }
    };

    let hx_post = (method == FormMethod::Post).then_some(endpoint);
    let hx_put = (method == FormMethod::Put).then_some(endpoint);

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (fields)
            (submit_button)
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use crate::{
        category::{Category, CategoryName},
        profile::{OwnerType, Profile},
        test_utils::{
            assert_form_input, assert_form_input_with_value, assert_form_select,
            assert_form_submit_button, assert_hx_endpoint, must_get_form,
        },
    };

    use super::{AccountFormValues, FormMethod, account_form_view};

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: 2,
                name: CategoryName::new_unchecked("Loan"),
            },
            Category {
                id: 1,
                name: CategoryName::new_unchecked("Savings"),
            },
        ]
    }

    #[test]
    fn renders_fields_for_single_person_household() {
        let markup = account_form_view(
            FormMethod::Post,
            "/api/accounts",
            "Create Account",
            &AccountFormValues::default(),
            &categories(),
            &Profile::default(),
        )
        .into_string();

        let html = Html::parse_fragment(&markup);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/accounts", "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_select(&form, "category_id", &["2", "1"]);
        assert_form_select(&form, "owner", &["me"]);
        assert_form_submit_button(&form);
    }

    #[test]
    fn fills_in_values_and_keeps_orphaned_owner() {
        let values = AccountFormValues {
            name: "Visa",
            bank: "ANZ",
            category_id: Some(1),
            owner: OwnerType::Spouse,
        };

        let markup = account_form_view(
            FormMethod::Put,
            "/api/accounts/1",
            "Save",
            &values,
            &categories(),
            &Profile::default(),
        )
        .into_string();

        let html = Html::parse_fragment(&markup);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/accounts/1", "hx-put");
        assert_form_input_with_value(&form, "name", "text", "Visa");
        assert_form_input_with_value(&form, "bank", "text", "ANZ");
        assert_form_select(&form, "owner", &["me", "spouse"]);

        let selected = html
            .select(&scraper::Selector::parse("select[name='category_id'] option[selected]").unwrap())
            .filter_map(|option| option.value().attr("value"))
            .collect::<Vec<_>>();
        assert_eq!(selected, vec!["1"]);
    }
}

//! Filtering the accounts list by a search query, category, owner and bank.
//!
//! The filters are carried in the query string of the accounts page, e.g.
//! `/accounts?search=visa&owner=Alex&owner=Joint`, so that a filtered view
//! can be bookmarked and survives opening the delete dialog.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::{
    account::{
        Account, AccountId, AccountType,
        form_options::{owner_color, owner_label},
    },
    profile::{Profile, ProfileColor},
};

/// An account as displayed in the accounts list.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountItem {
    pub id: AccountId,
    pub name: String,
    pub bank: String,
    /// The category name.
    pub category: String,
    /// The owner's display name.
    pub owner: String,
    pub owner_color: ProfileColor,
    pub account_type: AccountType,
    /// The most recent balance, if any has been recorded.
    pub balance: Option<f64>,
}

impl AccountItem {
    pub fn new(
        account: &Account,
        category: &str,
        balance: Option<f64>,
        profile: &Profile,
    ) -> Self {
        Self {
            id: account.id,
            name: account.name.to_string(),
            bank: account.bank.clone(),
            category: category.to_owned(),
            owner: owner_label(account.owner, profile),
            owner_color: owner_color(account.owner, profile),
            account_type: account.account_type,
            balance,
        }
    }
}

/// A choice in a select input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// The constraints on which accounts are shown.
///
/// An empty search or an empty list does not constrain anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountFilters {
    /// Case-insensitive text to look for in the account name or bank.
    #[serde(default)]
    pub search: String,
    /// Category names to include.
    #[serde(default)]
    pub category: Vec<String>,
    /// Owner display names to include.
    #[serde(default)]
    pub owner: Vec<String>,
    /// Banks to include.
    #[serde(default)]
    pub bank: Vec<String>,
}

impl AccountFilters {
    /// Whether `item` satisfies every filter.
    pub fn matches(&self, item: &AccountItem) -> bool {
        if !self.search.is_empty() {
            let query = self.search.to_lowercase();

            if !item.name.to_lowercase().contains(&query)
                && !item.bank.to_lowercase().contains(&query)
            {
                return false;
            }
        }

        let allows = |allowed: &[String], value: &str| {
            allowed.is_empty() || allowed.iter().any(|allowed| allowed == value)
        };

        allows(&self.category, &item.category)
            && allows(&self.owner, &item.owner)
            && allows(&self.bank, &item.bank)
    }

    /// The items that satisfy every filter, in their original order.
    pub fn apply<'a>(&self, items: &'a [AccountItem]) -> Vec<&'a AccountItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }

    /// Clear every filter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether any filter constrains the items.
    pub fn is_active(&self) -> bool {
        !self.search.is_empty()
            || !self.category.is_empty()
            || !self.owner.is_empty()
            || !self.bank.is_empty()
    }

    /// Encode the filters as a URL query string without the leading '?'.
    ///
    /// Lists are encoded as repeated keys, and empty filters are left out.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, &str)> = Vec::new();

        if !self.search.is_empty() {
            pairs.push(("search", &self.search));
        }

        for (key, values) in [
            ("category", &self.category),
            ("owner", &self.owner),
            ("bank", &self.bank),
        ] {
            pairs.extend(values.iter().map(|value| (key, value.as_str())));
        }

        serde_html_form::to_string(&pairs).unwrap_or_else(|error| {
            tracing::error!("could not encode account filters {self:?}: {error}");
            String::new()
        })
    }
}

fn unique_sorted_options<'a>(values: impl Iterator<Item = &'a str>) -> Vec<SelectOption> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|value| SelectOption {
            label: value.to_owned(),
            value: value.to_owned(),
        })
        .collect()
}

/// The distinct category names of `items`, sorted.
pub fn category_options(items: &[AccountItem]) -> Vec<SelectOption> {
    unique_sorted_options(items.iter().map(|item| item.category.as_str()))
}

/// The distinct owner names of `items`, sorted.
pub fn owner_options(items: &[AccountItem]) -> Vec<SelectOption> {
    unique_sorted_options(items.iter().map(|item| item.owner.as_str()))
}

/// The distinct banks of `items`, sorted.
pub fn bank_options(items: &[AccountItem]) -> Vec<SelectOption> {
    unique_sorted_options(items.iter().map(|item| item.bank.as_str()))
}

#[cfg(test)]
mod tests {
    use crate::{account::AccountType, profile::ProfileColor};

    use super::{
        AccountFilters, AccountItem, SelectOption, bank_options, category_options, owner_options,
    };

    fn item(id: i64, name: &str, bank: &str, category: &str, owner: &str) -> AccountItem {
        AccountItem {
            id,
            name: name.to_owned(),
            bank: bank.to_owned(),
            category: category.to_owned(),
            owner: owner.to_owned(),
            owner_color: ProfileColor::Primary,
            account_type: AccountType::Asset,
            balance: Some(100.0),
        }
    }

    fn items() -> Vec<AccountItem> {
        vec![
            item(1, "Everyday", "ANZ", "Checking", "Alex"),
            item(2, "Visa", "Westpac", "Credit Card", "Sam"),
            item(3, "Home", "ANZ", "Mortgage", "Joint"),
            item(4, "Rainy day", "Kiwibank", "Savings", "Alex"),
        ]
    }

    fn ids(items: Vec<&AccountItem>) -> Vec<i64> {
        items.into_iter().map(|item| item.id).collect()
    }

    #[test]
    fn empty_filters_keep_everything() {
        let filters = AccountFilters::default();

        assert!(!filters.is_active());
        assert_eq!(ids(filters.apply(&items())), vec![1, 2, 3, 4]);
    }

    #[test]
    fn search_matches_name_or_bank_ignoring_case() {
        let items = items();
        let by_name = AccountFilters {
            search: "VISA".to_owned(),
            ..Default::default()
        };
        let by_bank = AccountFilters {
            search: "anz".to_owned(),
            ..Default::default()
        };

        assert_eq!(ids(by_name.apply(&items)), vec![2]);
        assert_eq!(ids(by_bank.apply(&items)), vec![1, 3]);
    }

    #[test]
    fn list_filters_match_exact_values() {
        let filters = AccountFilters {
            owner: vec!["Alex".to_owned(), "Joint".to_owned()],
            ..Default::default()
        };

        assert_eq!(ids(filters.apply(&items())), vec![1, 3, 4]);

        let partial = AccountFilters {
            category: vec!["Credit".to_owned()],
            ..Default::default()
        };
        assert!(partial.apply(&items()).is_empty());
    }

    #[test]
    fn filters_combine() {
        let filters = AccountFilters {
            search: "a".to_owned(),
            bank: vec!["ANZ".to_owned()],
            owner: vec!["Alex".to_owned()],
            ..Default::default()
        };

        assert_eq!(ids(filters.apply(&items())), vec![1]);
    }

    #[test]
    fn adding_constraints_never_grows_result() {
        let items = items();
        let mut filters = AccountFilters::default();
        let mut previous = filters.apply(&items).len();

        filters.bank = vec!["ANZ".to_owned(), "Westpac".to_owned()];
        let count = filters.apply(&items).len();
        assert!(count <= previous);
        previous = count;

        filters.search = "e".to_owned();
        let count = filters.apply(&items).len();
        assert!(count <= previous);
        previous = count;

        filters.category = vec!["Checking".to_owned()];
        assert!(filters.apply(&items).len() <= previous);
    }

    #[test]
    fn reset_restores_empty_state() {
        let mut filters = AccountFilters {
            search: "foo".to_owned(),
            category: vec!["Savings".to_owned()],
            owner: vec!["Alex".to_owned()],
            bank: vec!["ANZ".to_owned()],
        };
        assert!(filters.is_active());

        filters.reset();

        assert_eq!(filters, AccountFilters::default());
        assert!(!filters.is_active());
    }

    #[test]
    fn options_are_unique_and_sorted() {
        let items = items();

        let values = |options: Vec<SelectOption>| -> Vec<String> {
            options.into_iter().map(|option| option.value).collect()
        };

        assert_eq!(values(bank_options(&items)), vec!["ANZ", "Kiwibank", "Westpac"]);
        assert_eq!(values(owner_options(&items)), vec!["Alex", "Joint", "Sam"]);
        assert_eq!(
            values(category_options(&items)),
            vec!["Checking", "Credit Card", "Mortgage", "Savings"]
        );
    }

    #[test]
    fn query_string_repeats_list_keys() {
        let filters = AccountFilters {
            search: "rainy day".to_owned(),
            owner: vec!["Alex".to_owned(), "Joint".to_owned()],
            ..Default::default()
        };

        assert_eq!(
            filters.to_query_string(),
            "search=rainy+day&owner=Alex&owner=Joint"
        );
    }

    #[test]
    fn query_string_round_trips() {
        let filters = AccountFilters {
            search: "a&b".to_owned(),
            category: vec!["Credit Card".to_owned()],
            owner: vec!["Sam".to_owned()],
            bank: vec!["ANZ".to_owned(), "Westpac".to_owned()],
        };

        let parsed: AccountFilters =
            serde_html_form::from_str(&filters.to_query_string()).unwrap();

        assert_eq!(parsed, filters);
    }

    #[test]
    fn empty_filters_have_empty_query_string() {
        assert_eq!(AccountFilters::default().to_query_string(), "");
    }
}

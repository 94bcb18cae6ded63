//! Choices offered by the account forms and how owners are displayed.

use crate::{
    account::filters::SelectOption,
    category::Category,
    profile::{OwnerType, Profile, ProfileColor},
};

/// One entry in the owner select of the account form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerOption {
    pub value: OwnerType,
    pub label: String,
}

/// The category choices, in the order given, with the category ID as the value.
pub fn category_options(categories: &[Category]) -> Vec<SelectOption> {
    categories
        .iter()
        .map(|category| SelectOption {
            label: category.name.to_string(),
            value: category.id.to_string(),
        })
        .collect()
}

/// The owners an account can have.
///
/// "Me" is always available. Spouse and joint ownership are only offered
/// once the profile has a spouse name.
pub fn owner_options(profile: &Profile) -> Vec<OwnerOption> {
    let mut options = vec![OwnerOption {
        value: OwnerType::Me,
        label: profile.user_name().unwrap_or("Me").to_owned(),
    }];

    if let Some(spouse_name) = profile.spouse_name() {
        options.push(OwnerOption {
            value: OwnerType::Spouse,
            label: spouse_name.to_owned(),
        });
        options.push(OwnerOption {
            value: OwnerType::Joint,
            label: "Joint".to_owned(),
        });
    }

    options
}

/// Map an owner's display name back to the owner type.
///
/// Unrecognised names fall back to [OwnerType::Me].
pub fn owner_type_from_label(label: &str, profile: &Profile) -> OwnerType {
    if label == "Joint" {
        return OwnerType::Joint;
    }

    match profile.spouse_name() {
        Some(spouse_name) if label == spouse_name => OwnerType::Spouse,
        _ => OwnerType::Me,
    }
}

/// The name to display for an account's owner.
pub fn owner_label(owner: OwnerType, profile: &Profile) -> String {
    match owner {
        OwnerType::Me => profile.user_name().unwrap_or("Me"),
        OwnerType::Spouse => profile.spouse_name().unwrap_or("Spouse"),
        OwnerType::Joint => "Joint",
    }
    .to_owned()
}

/// The color for an account's owner.
pub fn owner_color(owner: OwnerType, profile: &Profile) -> ProfileColor {
    match owner {
        OwnerType::Me => profile.user_color.unwrap_or(ProfileColor::Primary),
        OwnerType::Spouse => profile.spouse_color.unwrap_or(ProfileColor::Secondary),
        OwnerType::Joint => ProfileColor::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        account::filters::SelectOption,
        category::{Category, CategoryName},
        profile::{OwnerType, Profile, ProfileColor},
    };

    use super::{
        OwnerOption, category_options, owner_color, owner_label, owner_options,
        owner_type_from_label,
    };

    fn couple() -> Profile {
        Profile {
            user_name: Some("Alex".to_owned()),
            spouse_name: Some("Sam".to_owned()),
            user_color: Some(ProfileColor::Info),
            spouse_color: None,
        }
    }

    #[test]
    fn category_options_keep_order() {
        let categories = vec![
            Category {
                id: 2,
                name: CategoryName::new_unchecked("Savings"),
            },
            Category {
                id: 1,
                name: CategoryName::new_unchecked("Loan"),
            },
        ];

        assert_eq!(
            category_options(&categories),
            vec![
                SelectOption {
                    label: "Savings".to_owned(),
                    value: "2".to_owned()
                },
                SelectOption {
                    label: "Loan".to_owned(),
                    value: "1".to_owned()
                },
            ]
        );
    }

    #[test]
    fn single_person_household_only_has_me() {
        assert_eq!(
            owner_options(&Profile::default()),
            vec![OwnerOption {
                value: OwnerType::Me,
                label: "Me".to_owned()
            }]
        );
    }

    #[test]
    fn couple_has_spouse_and_joint() {
        assert_eq!(
            owner_options(&couple()),
            vec![
                OwnerOption {
                    value: OwnerType::Me,
                    label: "Alex".to_owned()
                },
                OwnerOption {
                    value: OwnerType::Spouse,
                    label: "Sam".to_owned()
                },
                OwnerOption {
                    value: OwnerType::Joint,
                    label: "Joint".to_owned()
                },
            ]
        );
    }

    #[test]
    fn owner_type_from_label_maps_names() {
        let profile = couple();

        assert_eq!(owner_type_from_label("Joint", &profile), OwnerType::Joint);
        assert_eq!(owner_type_from_label("Sam", &profile), OwnerType::Spouse);
        assert_eq!(owner_type_from_label("Alex", &profile), OwnerType::Me);
        assert_eq!(owner_type_from_label("Someone else", &profile), OwnerType::Me);
    }

    #[test]
    fn spouse_label_without_spouse_is_me() {
        assert_eq!(
            owner_type_from_label("Spouse", &Profile::default()),
            OwnerType::Me
        );
    }

    #[test]
    fn labels_fall_back_to_defaults() {
        let profile = Profile::default();

        assert_eq!(owner_label(OwnerType::Me, &profile), "Me");
        assert_eq!(owner_label(OwnerType::Spouse, &profile), "Spouse");
        assert_eq!(owner_label(OwnerType::Joint, &couple()), "Joint");
        assert_eq!(owner_label(OwnerType::Spouse, &couple()), "Sam");
    }

    #[test]
    fn colors_fall_back_to_defaults() {
        let profile = couple();

        assert_eq!(owner_color(OwnerType::Me, &profile), ProfileColor::Info);
        assert_eq!(
            owner_color(OwnerType::Spouse, &profile),
            ProfileColor::Secondary
        );
        assert_eq!(
            owner_color(OwnerType::Joint, &profile),
            ProfileColor::Neutral
        );
    }
}

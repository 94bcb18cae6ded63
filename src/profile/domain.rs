//! Core profile domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Who an account belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerType {
    /// The primary user of the app.
    Me,
    /// The user's spouse or partner.
    Spouse,
    /// Both of them.
    Joint,
}

impl OwnerType {
    #[cfg(test)]
    pub const ALL: [OwnerType; 3] = [OwnerType::Me, OwnerType::Spouse, OwnerType::Joint];

    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerType::Me => "me",
            OwnerType::Spouse => "spouse",
            OwnerType::Joint => "joint",
        }
    }
}

impl FromStr for OwnerType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "me" => Ok(OwnerType::Me),
            "spouse" => Ok(OwnerType::Spouse),
            "joint" => Ok(OwnerType::Joint),
            _ => Err(Error::InvalidOwnerType(s.to_owned())),
        }
    }
}

impl Display for OwnerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for OwnerType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for OwnerType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// A semantic color used to tell household members apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileColor {
    Primary,
    Secondary,
    Success,
    Info,
    Warning,
    Error,
    Neutral,
}

impl ProfileColor {
    pub const ALL: [ProfileColor; 7] = [
        ProfileColor::Primary,
        ProfileColor::Secondary,
        ProfileColor::Success,
        ProfileColor::Info,
        ProfileColor::Warning,
        ProfileColor::Error,
        ProfileColor::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileColor::Primary => "primary",
            ProfileColor::Secondary => "secondary",
            ProfileColor::Success => "success",
            ProfileColor::Info => "info",
            ProfileColor::Warning => "warning",
            ProfileColor::Error => "error",
            ProfileColor::Neutral => "neutral",
        }
    }

    /// The color name with the first letter capitalised, e.g. "Primary".
    pub fn label(&self) -> &'static str {
        match self {
            ProfileColor::Primary => "Primary",
            ProfileColor::Secondary => "Secondary",
            ProfileColor::Success => "Success",
            ProfileColor::Info => "Info",
            ProfileColor::Warning => "Warning",
            ProfileColor::Error => "Error",
            ProfileColor::Neutral => "Neutral",
        }
    }

    /// Tailwind classes for a small badge in this color.
    pub fn badge_style(&self) -> &'static str {
        match self {
            ProfileColor::Primary => {
                "bg-blue-100 text-blue-800 dark:bg-blue-900 dark:text-blue-300"
            }
            ProfileColor::Secondary => {
                "bg-purple-100 text-purple-800 dark:bg-purple-900 dark:text-purple-300"
            }
            ProfileColor::Success => {
                "bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-300"
            }
            ProfileColor::Info => "bg-cyan-100 text-cyan-800 dark:bg-cyan-900 dark:text-cyan-300",
            ProfileColor::Warning => {
                "bg-yellow-100 text-yellow-800 dark:bg-yellow-900 dark:text-yellow-300"
            }
            ProfileColor::Error => "bg-red-100 text-red-800 dark:bg-red-900 dark:text-red-300",
            ProfileColor::Neutral => {
                "bg-gray-100 text-gray-800 dark:bg-gray-700 dark:text-gray-300"
            }
        }
    }
}

impl FromStr for ProfileColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();

        ProfileColor::ALL
            .into_iter()
            .find(|color| color.as_str() == name)
            .ok_or_else(|| Error::InvalidColor(s.to_owned()))
    }
}

impl Display for ProfileColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for ProfileColor {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ProfileColor {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// The names and colors of the household members.
///
/// A household without a spouse name is a single-person household, in which
/// case only "me" is offered as an account owner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub user_name: Option<String>,
    pub spouse_name: Option<String>,
    pub user_color: Option<ProfileColor>,
    pub spouse_color: Option<ProfileColor>,
}

impl Profile {
    /// The spouse's name if it is set and not blank.
    pub fn spouse_name(&self) -> Option<&str> {
        non_blank(self.spouse_name.as_deref())
    }

    /// The user's name if it is set and not blank.
    pub fn user_name(&self) -> Option<&str> {
        non_blank(self.user_name.as_deref())
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|text| !text.is_empty())
}

/// Form data for the settings page.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProfileFormData {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub spouse_name: String,
    #[serde(default)]
    pub user_color: String,
    #[serde(default)]
    pub spouse_color: String,
}

impl TryFrom<ProfileFormData> for Profile {
    type Error = Error;

    fn try_from(form: ProfileFormData) -> Result<Self, Self::Error> {
        let name = |text: String| {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_owned())
        };
        let color = |text: String| -> Result<Option<ProfileColor>, Error> {
            if text.trim().is_empty() {
                Ok(None)
            } else {
                text.parse().map(Some)
            }
        };

        Ok(Profile {
            user_name: name(form.user_name),
            spouse_name: name(form.spouse_name),
            user_color: color(form.user_color)?,
            spouse_color: color(form.spouse_color)?,
        })
    }
}

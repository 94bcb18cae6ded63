//! The household profile: the names and colors of the people who own accounts.

mod db;
mod domain;
mod settings_page;

pub use db::{create_profile_table, get_profile, save_profile};
pub use domain::{OwnerType, Profile, ProfileColor};
pub use settings_page::{get_settings_page, update_profile_endpoint};

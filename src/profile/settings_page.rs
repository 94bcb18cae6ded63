//! The settings page for editing the household profile.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
    profile::{Profile, ProfileColor, domain::ProfileFormData, get_profile, save_profile},
};

/// The state needed for the settings page and profile endpoint.
#[derive(Debug, Clone)]
pub struct SettingsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the settings page with the saved profile filled in.
pub async fn get_settings_page(State(state): State<SettingsState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let profile = get_profile(&connection)
        .inspect_err(|error| tracing::error!("could not get profile: {error}"))?;

    Ok(settings_view(&profile).into_response())
}

/// Save the household profile.
pub async fn update_profile_endpoint(
    State(state): State<SettingsState>,
    Form(form): Form<ProfileFormData>,
) -> Response {
    let profile = match Profile::try_from(form) {
        Ok(profile) => profile,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match save_profile(&profile, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Profile saved".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("could not save profile {profile:?}: {error}");
            error.into_alert_response()
        }
    }
}

fn color_select(name: &str, label: &str, selected: Option<ProfileColor>) -> Markup {
    html!(
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select id=(name) name=(name) class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" selected[selected.is_none()] { "Default" }

                @for color in ProfileColor::ALL {
                    option value=(color.as_str()) selected[selected == Some(color)]
                    {
                        (color.label())
                    }
                }
            }
        }
    )
}

fn settings_view(profile: &Profile) -> Markup {
    let nav_bar = NavBar::new(endpoints::SETTINGS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="w-full mb-4 text-xl font-bold" { "Household" }

            form
                hx-put=(endpoints::PUT_PROFILE)
                hx-target-error="#alert-container"
                hx-swap="none"
                class="w-full space-y-4 md:space-y-6"
            {
                div
                {
                    label for="user_name" class=(FORM_LABEL_STYLE) { "Your name" }

                    input
                        id="user_name"
                        type="text"
                        name="user_name"
                        placeholder="Me"
                        value=(profile.user_name.as_deref().unwrap_or_default())
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                (color_select("user_color", "Your color", profile.user_color))

                div
                {
                    label for="spouse_name" class=(FORM_LABEL_STYLE) { "Spouse's name" }

                    input
                        id="spouse_name"
                        type="text"
                        name="spouse_name"
                        placeholder="Leave blank for a single-person household"
                        value=(profile.spouse_name.as_deref().unwrap_or_default())
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                (color_select("spouse_color", "Spouse's color", profile.spouse_color))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
            }

            section class="w-full mt-8 space-y-2"
            {
                h2 class="text-lg font-semibold" { "Snapshots" }

                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Monthly snapshots are updated whenever a balance changes. \
                    Rebuild them if the dashboard looks out of date."
                }

                button
                    type="button"
                    id="indicator"
                    hx-post=(endpoints::REBUILD_SNAPSHOTS)
                    hx-target-error="#alert-container"
                    hx-swap="none"
                    hx-disabled-elt="this"
                    class=(BUTTON_SECONDARY_STYLE)
                {
                    span class="htmx-indicator" { (loading_spinner()) }
                    "Rebuild snapshots"
                }
            }
        }
    );

    base("Settings", &[], &content)
}

#[cfg(test)]
mod settings_page_tests {
    use axum::extract::State;

    use crate::{
        endpoints,
        profile::{Profile, ProfileColor, save_profile, settings_page::SettingsState},
        test_utils::{
            assert_content_type, assert_form_input_with_value, assert_form_select,
            assert_form_submit_button, assert_hx_endpoint, assert_status_ok, assert_valid_html,
            get_test_state, must_get_form, must_select, parse_html_document,
        },
    };

    use super::get_settings_page;

    #[tokio::test]
    async fn renders_saved_profile() {
        let state = get_test_state();
        save_profile(
            &Profile {
                user_name: Some("Alex".to_owned()),
                spouse_name: Some("Sam".to_owned()),
                user_color: Some(ProfileColor::Info),
                spouse_color: None,
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_settings_page(State(SettingsState {
            db_connection: state.db_connection.clone(),
        }))
        .await
        .unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::PUT_PROFILE, "hx-put");
        assert_form_input_with_value(&form, "user_name", "text", "Alex");
        assert_form_input_with_value(&form, "spouse_name", "text", "Sam");
        assert_form_select(
            &form,
            "user_color",
            &[
                "primary",
                "secondary",
                "success",
                "info",
                "warning",
                "error",
                "neutral",
            ],
        );
        assert_form_submit_button(&form);

        let selected = must_select(&html, "select[name='user_color'] option[selected]");
        assert_eq!(selected.value().attr("value"), Some("info"));
        let rebuild = must_select(&html, "button[hx-post]");
        assert_eq!(
            rebuild.value().attr("hx-post"),
            Some(endpoints::REBUILD_SNAPSHOTS)
        );
    }
}

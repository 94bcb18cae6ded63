//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered as HTML fragments that HTMX swaps into the
//! `#alert-container` element defined in [crate::html::base].

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// An alert message with optional details.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with details.
    Success { message: String, details: String },
    /// A success message without details.
    SuccessSimple { message: String },
    /// An error message with details.
    Error { message: String, details: String },
    /// An error message without details.
    ErrorSimple { message: String },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Html<String> {
        Html(self.into_markup().into_string())
    }

    fn into_markup(self) -> Markup {
        let (is_error, message, details) = match self {
            Alert::Success { message, details } => (false, message, details),
            Alert::SuccessSimple { message } => (false, message, String::new()),
            Alert::Error { message, details } => (true, message, details),
            Alert::ErrorSimple { message } => (true, message, String::new()),
        };

        let container_style = if is_error {
            "flex items-start p-4 mb-4 text-red-800 rounded-lg bg-red-50 \
            dark:bg-gray-800 dark:text-red-400 shadow-lg"
        } else {
            "flex items-start p-4 mb-4 text-green-800 rounded-lg bg-green-50 \
            dark:bg-gray-800 dark:text-green-400 shadow-lg"
        };

        html!(
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div
                    role="alert"
                    class=(container_style)
                {
                    div class="ms-3 text-sm font-medium"
                    {
                        p class="font-semibold" { (message) }

                        @if !details.is_empty() {
                            p class="mt-1" { (details) }
                        }
                    }

                    button
                        type="button"
                        class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex h-8 w-8"
                        aria-label="Close"
                        onclick="document.getElementById('alert-container').classList.add('hidden')"
                    {
                        span class="sr-only" { "Close" }
                        "×"
                    }
                }
            }
        )
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_contains_message_and_details() {
        let alert = Alert::Error {
            message: "Oh no".to_owned(),
            details: "It broke".to_owned(),
        };

        let html = Html::parse_fragment(&alert.into_html().0);

        let text = html
            .select(&Selector::parse("div[role='alert']").unwrap())
            .next()
            .expect("could not find alert")
            .text()
            .collect::<String>();
        assert!(text.contains("Oh no"), "got {text}");
        assert!(text.contains("It broke"), "got {text}");
    }

    #[test]
    fn simple_alert_omits_details_paragraph() {
        let alert = Alert::SuccessSimple {
            message: "Done".to_owned(),
        };

        let html = Html::parse_fragment(&alert.into_html().0);

        let paragraphs = html.select(&Selector::parse("p").unwrap()).count();
        assert_eq!(paragraphs, 1);
    }
}

//! Success and error messages shown to the user after an htmx request.
//!
//! Alerts are swapped out-of-band into the `#alert-container` element that
//! [crate::html::base] places at the bottom of every page.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// A message to display in the alert container.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An operation succeeded.
    Success { message: String },
    /// An operation failed.
    Error { message: String, details: String },
}

impl Alert {
    fn view(&self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::Success { message } => (SUCCESS_STYLE, message, None),
            Alert::Error { message, details } => (ERROR_STYLE, message, Some(details)),
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(container_style) role="alert"
                {
                    div class="flex items-start justify-between gap-4"
                    {
                        div
                        {
                            p class="font-semibold" { (message) }

                            @if let Some(details) = details.filter(|details| !details.is_empty())
                            {
                                p class="text-sm" { (details) }
                            }
                        }

                        button
                            type="button"
                            aria-label="Dismiss"
                            class="text-lg leading-none"
                            onclick="this.closest('#alert-container').classList.add('hidden')"
                        {
                            "×"
                        }
                    }
                }
            }
        }
    }

    pub fn into_html(self) -> Html<String> {
        Html(self.view().into_string())
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

const SUCCESS_STYLE: &str = "p-4 rounded shadow text-green-800 bg-green-50 \
    border border-green-300 dark:bg-gray-800 dark:text-green-400 dark:border-green-800";

const ERROR_STYLE: &str = "p-4 rounded shadow text-red-800 bg-red-50 \
    border border-red-300 dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

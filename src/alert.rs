//! Success and error alerts swapped into the fixed alert container by HTMX.

use maud::{Markup, html};

/// An alert message shown to the user after an HTMX request.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The operation succeeded.
    Success {
        /// The headline of the alert.
        message: String,
        /// Extra context shown under the headline.
        details: String,
    },
    /// The operation failed.
    Error {
        /// The headline of the alert.
        message: String,
        /// Extra context shown under the headline.
        details: String,
    },
}

impl Alert {
    /// Render the alert as markup targeting the `#alert-container` element.
    pub fn into_html(self) -> Markup {
        let (message, details, container_style, accent_style) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "p-4 rounded-lg border border-green-300 bg-green-50 \
                dark:bg-gray-800 dark:border-green-800",
                "text-green-800 dark:text-green-400",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "p-4 rounded-lg border border-red-300 bg-red-50 \
                dark:bg-gray-800 dark:border-red-800",
                "text-red-800 dark:text-red-400",
            ),
        };

        html!(
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(container_style)
                {
                    div class="flex items-start justify-between gap-2"
                    {
                        div
                        {
                            h3 class={ "text-sm font-semibold " (accent_style) } { (message) }

                            @if !details.is_empty() {
                                p class={ "mt-1 text-sm " (accent_style) } { (details) }
                            }
                        }

                        button
                            type="button"
                            class={ "text-sm font-bold " (accent_style) }
                            onclick="this.closest('#alert-container').classList.add('hidden')"
                        {
                            "✕"
                        }
                    }
                }
            }
        )
    }

    /// Create a success alert.
    pub fn success(message: &str, details: &str) -> Self {
        Alert::Success {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create an error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Alert::Error {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }
}

//! The donation form for a campaign.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState,
    campaign::get_campaign,
    database_id::CampaignId,
    donation::core::get_recent_donations,
    endpoints,
    error::Error,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base, format_currency,
    },
    navigation::NavBar,
};

/// How many recent donations to show beside the form.
const RECENT_DONATION_COUNT: u64 = 5;

/// The state needed to display the donation form.
#[derive(Debug, Clone)]
pub struct DonatePageState {
    /// The database connection for looking up the campaign.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DonatePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the donation form for one campaign.
pub async fn get_donate_page(
    State(state): State<DonatePageState>,
    Path(campaign_id): Path<CampaignId>,
) -> Result<Response, Error> {
    let (campaign, recent_donations) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let campaign = get_campaign(campaign_id, &connection)?;
        let recent_donations =
            get_recent_donations(campaign_id, RECENT_DONATION_COUNT, &connection)?;

        (campaign, recent_donations)
    };

    let content = html! {
        (NavBar::new(endpoints::CAMPAIGNS_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-md"
            {
                h1 class="text-3xl font-bold mb-2" { "Donate to " (campaign.title) }

                p class="text-gray-600 dark:text-gray-300 mb-6"
                {
                    (format_currency(campaign.current_amount))
                    " raised of "
                    (format_currency(campaign.target_amount))
                }

                form
                    class="space-y-4 mb-8"
                    hx-post=(endpoints::DONATIONS_API)
                    hx-target-error="this"
                {
                    input type="hidden" name="campaign_id" value=(campaign.id);

                    div
                    {
                        label for="amount" class=(FORM_LABEL_STYLE) { "Amount (Rp)" }

                        input
                            type="number"
                            name="amount"
                            id="amount"
                            min="1"
                            step="1"
                            placeholder="50000"
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }

                    div
                    {
                        label for="donor_name" class=(FORM_LABEL_STYLE) { "Your name" }

                        input
                            type="text"
                            name="donor_name"
                            id="donor_name"
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="donor_email" class=(FORM_LABEL_STYLE) { "Email" }

                        input
                            type="email"
                            name="donor_email"
                            id="donor_email"
                            placeholder="you@example.com"
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }

                    div
                    {
                        label for="message" class=(FORM_LABEL_STYLE)
                        {
                            "Message of support (optional)"
                        }

                        textarea
                            name="message"
                            id="message"
                            rows="3"
                            class=(FORM_TEXT_INPUT_STYLE)
                        {}
                    }

                    div class="flex items-center gap-2"
                    {
                        input
                            type="checkbox"
                            name="anonymous"
                            id="anonymous"
                            class="w-4 h-4 rounded border-gray-300 dark:border-gray-600";

                        label for="anonymous" class=(FORM_LABEL_STYLE) { "Donate anonymously" }
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Donate" }
                }

                @if !recent_donations.is_empty() {
                    div class=(CARD_STYLE)
                    {
                        h2 class="text-xl font-semibold mb-4" { "Recent supporters" }

                        ul class="space-y-2"
                        {
                            @for donation in &recent_donations {
                                li class="flex justify-between text-sm"
                                {
                                    span { (donation.donor_name) }
                                    span { (format_currency(donation.amount)) }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    Ok(base("Donate", &[], &content).into_response())
}

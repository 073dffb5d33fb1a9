//! The campaign detail page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState,
    campaign::core::{CampaignStatus, get_campaign},
    database_id::CampaignId,
    endpoints,
    error::Error,
    html::{
        BADGE_STYLE, BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, base, format_currency,
        format_date,
    },
    navigation::NavBar,
    timezone::get_local_date,
};

/// The state needed to display the campaign detail page.
#[derive(Debug, Clone)]
pub struct CampaignPageState {
    /// The local timezone as a canonical timezone name.
    pub local_timezone: String,
    /// The database connection for looking up the campaign.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CampaignPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the detail page for one campaign.
pub async fn get_campaign_page(
    State(state): State<CampaignPageState>,
    Path(campaign_id): Path<CampaignId>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let campaign = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_campaign(campaign_id, &connection)?
    };

    let percent = campaign.percent_funded();
    let days_left = campaign.days_left(today);
    let donate_url = endpoints::format_endpoint(endpoints::DONATE_VIEW, campaign.id);

    let content = html! {
        (NavBar::new(endpoints::CAMPAIGNS_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-lg"
            {
                img
                    src=(campaign.image_url)
                    alt=(campaign.title)
                    class="w-full h-72 object-cover rounded-lg mb-6";

                div class="flex items-center gap-4 mb-4"
                {
                    span class=(BADGE_STYLE) { (campaign.category) }
                    span class="text-sm text-gray-500 dark:text-gray-400" { (campaign.location) }
                }

                h1 class="text-3xl font-bold mb-4" { (campaign.title) }

                div class="w-full bg-gray-200 rounded-full h-3 dark:bg-gray-700 mb-2"
                {
                    div
                        class="bg-amber-600 h-3 rounded-full"
                        style=(format!("width: {percent:.0}%;"))
                    {}
                }

                div class="flex flex-wrap justify-between text-sm mb-6"
                {
                    p
                    {
                        strong { (format_currency(campaign.current_amount)) }
                        " raised of "
                        (format_currency(campaign.target_amount))
                    }

                    @match campaign.status {
                        CampaignStatus::Active => p { (days_left) " days left" }
                        CampaignStatus::Completed => p { "This campaign has been completed." }
                        CampaignStatus::Cancelled => p { "This campaign has been cancelled." }
                    }
                }

                p class="text-xs text-gray-500 dark:text-gray-400 mb-6"
                {
                    "Runs from " (format_date(campaign.start_date))
                    " to " (format_date(campaign.end_date))
                }

                div class="prose dark:prose-invert max-w-none mb-8"
                {
                    p { (campaign.description) }
                }

                @if campaign.status == CampaignStatus::Active {
                    a href=(donate_url)
                    {
                        button class=(BUTTON_PRIMARY_STYLE) { "Donate now" }
                    }
                }
            }
        }
    };

    Ok(base(&campaign.title, &[], &content).into_response())
}

#[cfg(test)]
mod campaign_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        campaign::core::{NewCampaign, create_campaign, create_campaign_table},
        database_id::CampaignId,
        endpoints::{self, format_endpoint},
    };

    use super::{CampaignPageState, get_campaign_page};

    fn get_test_server() -> (TestServer, CampaignId) {
        let connection = Connection::open_in_memory().expect("could not open database");
        create_campaign_table(&connection).expect("could not create campaign table");

        let campaign = create_campaign(
            NewCampaign {
                title: "Feeding Program".to_owned(),
                short_description: "Daily food for the colony".to_owned(),
                description: "We feed thirty cats every evening.".to_owned(),
                image_url: "/static/cat.jpg".to_owned(),
                target_amount: 10_000_000.0,
                start_date: date!(2024 - 06 - 01),
                end_date: date!(2024 - 09 - 01),
                category: "Feeding".to_owned(),
                location: "Jakarta Selatan".to_owned(),
                featured: false,
            },
            &connection,
        )
        .expect("could not create campaign");

        let state = CampaignPageState {
            local_timezone: "Asia/Jakarta".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let app = Router::new()
            .route(endpoints::CAMPAIGN_VIEW, get(get_campaign_page))
            .with_state(state);

        let server = TestServer::new(app);

        (server, campaign.id)
    }

    #[tokio::test]
    async fn shows_campaign_details() {
        let (server, campaign_id) = get_test_server();

        let response = server
            .get(&format_endpoint(endpoints::CAMPAIGN_VIEW, campaign_id))
            .await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("Feeding Program"));
        assert!(text.contains("We feed thirty cats every evening."));
        assert!(text.contains("Rp10.000.000"));
        assert!(text.contains(&format_endpoint(endpoints::DONATE_VIEW, campaign_id)));
    }

    #[tokio::test]
    async fn unknown_campaign_returns_404() {
        let (server, _) = get_test_server();

        let response = server
            .get(&format_endpoint(endpoints::CAMPAIGN_VIEW, 999))
            .await;

        response.assert_status_not_found();
    }
}

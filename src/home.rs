//! The home page with the hero section and featured campaigns.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState,
    campaign::{campaign_card, get_featured_campaigns},
    endpoints,
    error::Error,
    html::{BUTTON_PRIMARY_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// How many featured campaigns the home page shows.
const FEATURED_CAMPAIGN_COUNT: u64 = 3;

/// The state needed to display the home page.
#[derive(Debug, Clone)]
pub struct HomePageState {
    /// The database connection for listing featured campaigns.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for HomePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the home page.
pub async fn get_home_page(State(state): State<HomePageState>) -> Result<Response, Error> {
    let featured = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_featured_campaigns(FEATURED_CAMPAIGN_COUNT, &connection)?
    };

    let content = html! {
        (NavBar::new(endpoints::ROOT).into_html())

        section class="bg-amber-50 dark:bg-gray-800"
        {
            div class="max-w-screen-xl mx-auto px-6 py-16 text-center"
            {
                h1 class="text-4xl font-extrabold mb-4 text-gray-900 dark:text-white"
                {
                    "Help the stray cats of Jakarta"
                }

                p class="text-lg text-gray-600 dark:text-gray-300 mb-8 max-w-2xl mx-auto"
                {
                    "Catfund is a community fund for feeding, sterilising, and treating \
                    stray cats. Every rupiah is accounted for in our public ledger."
                }

                div class="flex gap-4 justify-center"
                {
                    a href=(endpoints::CAMPAIGNS_VIEW)
                    {
                        button class=(BUTTON_PRIMARY_STYLE) style="width: auto;"
                        {
                            "Browse campaigns"
                        }
                    }

                    a href=(endpoints::VOLUNTEER_VIEW)
                    {
                        button
                            class="px-4 py-2 border border-amber-600 text-amber-700 \
                                dark:text-amber-500 rounded hover:bg-amber-50 \
                                dark:hover:bg-gray-700"
                        {
                            "Become a volunteer"
                        }
                    }
                }
            }
        }

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                @if !featured.is_empty() {
                    h2 class="text-2xl font-bold mb-6" { "Featured campaigns" }

                    div class="grid gap-6 md:grid-cols-2 lg:grid-cols-3 mb-12"
                    {
                        @for campaign in &featured {
                            (campaign_card(campaign))
                        }
                    }
                }

                section class="text-center py-8"
                {
                    h2 class="text-2xl font-bold mb-2" { "Where does the money go?" }

                    p class="text-gray-600 dark:text-gray-300 mb-4"
                    {
                        "Every donation and every expense is published in our fund report."
                    }

                    a href=(endpoints::TRANSPARENCY_VIEW) class=(LINK_STYLE)
                    {
                        "See the fund transparency report"
                    }
                }
            }
        }
    };

    Ok(base("Home", &[], &content).into_response())
}

//! The campaign listing page with category filter, search, and pagination.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState,
    campaign::core::{Campaign, CampaignFilter, get_campaign_categories, get_campaigns},
    endpoints,
    error::Error,
    html::{
        BADGE_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base, format_currency,
    },
    navigation::NavBar,
    pagination::{PaginationConfig, PaginationIndicator, create_pagination_indicators},
};

/// The state needed to display the campaign listing page.
#[derive(Debug, Clone)]
pub struct CampaignsPageState {
    /// How the listing should be paginated.
    pub pagination_config: PaginationConfig,
    /// The database connection for listing campaigns.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CampaignsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            pagination_config: state.pagination_config.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the campaign listing page.
#[derive(Debug, Default, Deserialize)]
pub struct CampaignsQuery {
    /// The page to display, starting from one.
    pub page: Option<u64>,
    /// Only show campaigns with this category.
    pub category: Option<String>,
    /// Only show campaigns matching this search text.
    pub search: Option<String>,
}

/// Display the campaign listing page.
pub async fn get_campaigns_page(
    State(state): State<CampaignsPageState>,
    Query(query): Query<CampaignsQuery>,
) -> Result<Response, Error> {
    let filter = CampaignFilter {
        category: query.category.clone().filter(|category| !category.is_empty()),
        search: query.search.clone().filter(|search| !search.is_empty()),
        featured_only: false,
    };
    let page = query.page.unwrap_or(state.pagination_config.default_page);
    let page_size = state.pagination_config.default_page_size;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let (campaigns, total) = get_campaigns(&filter, page, page_size, &connection)?;
    let categories = get_campaign_categories(&connection)?;

    let page_count = total.div_ceil(page_size).max(1);
    let indicators = create_pagination_indicators(page, page_count, state.pagination_config.max_pages);

    let content = html! {
        (NavBar::new(endpoints::CAMPAIGNS_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                h1 class="text-3xl font-bold mb-6" { "Campaigns" }

                (filter_controls(&filter, &categories))

                @if campaigns.is_empty() {
                    p class="text-gray-500 dark:text-gray-400 py-12 text-center"
                    {
                        "No campaigns match your filters."
                    }
                } @else {
                    div class="grid gap-6 md:grid-cols-2 lg:grid-cols-3"
                    {
                        @for campaign in &campaigns {
                            (campaign_card(campaign))
                        }
                    }
                }

                (pagination_controls(&indicators, &filter))
            }
        }
    };

    Ok(base("Campaigns", &[], &content).into_response())
}

fn filter_controls(filter: &CampaignFilter, categories: &[String]) -> Markup {
    html! {
        form method="get" action=(endpoints::CAMPAIGNS_VIEW) class="flex flex-wrap gap-4 mb-6"
        {
            select name="category" class=(FORM_TEXT_INPUT_STYLE) style="width: auto;"
            {
                option value="" { "All categories" }

                @for category in categories {
                    option
                        value=(category)
                        selected[filter.category.as_deref() == Some(category)]
                    {
                        (category)
                    }
                }
            }

            input
                type="search"
                name="search"
                placeholder="Search campaigns..."
                value=[filter.search.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE)
                style="width: auto; flex-grow: 1;";

            button type="submit" class=(BUTTON_PRIMARY_STYLE) style="width: auto;" { "Filter" }
        }
    }
}

/// One campaign card in the listing grid.
pub fn campaign_card(campaign: &Campaign) -> Markup {
    let detail_url = endpoints::format_endpoint(endpoints::CAMPAIGN_VIEW, campaign.id);
    let percent = campaign.percent_funded();

    html! {
        a href=(detail_url) class=(CARD_STYLE)
        {
            img
                src=(campaign.image_url)
                alt=(campaign.title)
                class="w-full h-48 object-cover rounded mb-4";

            div class="flex items-center justify-between mb-2"
            {
                span class=(BADGE_STYLE) { (campaign.category) }
                span class="text-sm text-gray-500 dark:text-gray-400" { (campaign.location) }
            }

            h2 class="text-xl font-semibold mb-2" { (campaign.title) }

            p class="text-sm text-gray-600 dark:text-gray-300 mb-4"
            {
                (campaign.short_description)
            }

            div class="w-full bg-gray-200 rounded-full h-2.5 dark:bg-gray-700 mb-2"
            {
                div
                    class="bg-amber-600 h-2.5 rounded-full"
                    style=(format!("width: {percent:.0}%;"))
                {}
            }

            p class="text-sm"
            {
                strong { (format_currency(campaign.current_amount)) }
                " raised of "
                (format_currency(campaign.target_amount))
            }
        }
    }
}

fn page_url(page: u64, filter: &CampaignFilter) -> String {
    let mut url = format!("{}?page={page}", endpoints::CAMPAIGNS_VIEW);

    if let Some(category) = &filter.category {
        url.push_str(&format!("&category={category}"));
    }

    if let Some(search) = &filter.search {
        url.push_str(&format!("&search={search}"));
    }

    url
}

fn pagination_controls(indicators: &[PaginationIndicator], filter: &CampaignFilter) -> Markup {
    const PAGE_LINK_STYLE: &str = "px-3 py-2 rounded border border-gray-300 \
        dark:border-gray-600 hover:bg-gray-100 dark:hover:bg-gray-700";
    const CURR_PAGE_STYLE: &str = "px-3 py-2 rounded bg-amber-600 text-white";

    html! {
        @if indicators.len() > 1 {
            nav class="flex gap-2 justify-center mt-8" aria-label="pagination"
            {
                @for indicator in indicators {
                    @match indicator {
                        PaginationIndicator::BackButton(page) => {
                            a href=(page_url(*page, filter)) class=(PAGE_LINK_STYLE) { "Previous" }
                        }
                        PaginationIndicator::NextButton(page) => {
                            a href=(page_url(*page, filter)) class=(PAGE_LINK_STYLE) { "Next" }
                        }
                        PaginationIndicator::Page(page) => {
                            a href=(page_url(*page, filter)) class=(PAGE_LINK_STYLE) { (page) }
                        }
                        PaginationIndicator::CurrPage(page) => {
                            span class=(CURR_PAGE_STYLE) { (page) }
                        }
                        PaginationIndicator::Ellipsis => {
                            span class="px-3 py-2" { "..." }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod campaigns_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        campaign::core::{NewCampaign, create_campaign, create_campaign_table},
        endpoints,
        pagination::PaginationConfig,
    };

    use super::{CampaignsPageState, get_campaigns_page};

    fn get_test_server(campaign_count: usize) -> TestServer {
        let connection = Connection::open_in_memory().expect("could not open database");
        create_campaign_table(&connection).expect("could not create campaign table");

        for n in 1..=campaign_count {
            create_campaign(
                NewCampaign {
                    title: format!("Campaign {n}"),
                    short_description: "Helping stray cats".to_owned(),
                    description: "The full story".to_owned(),
                    image_url: "/static/cat.jpg".to_owned(),
                    target_amount: 10_000_000.0,
                    start_date: date!(2024 - 06 - 01),
                    end_date: date!(2024 - 09 - 01),
                    category: if n % 2 == 0 { "Feeding" } else { "Medical" }.to_owned(),
                    location: "Jakarta Selatan".to_owned(),
                    featured: false,
                },
                &connection,
            )
            .expect("could not create campaign");
        }

        let state = CampaignsPageState {
            pagination_config: PaginationConfig::default(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let app = Router::new()
            .route(endpoints::CAMPAIGNS_VIEW, get(get_campaigns_page))
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn lists_campaign_cards() {
        let server = get_test_server(3);

        let response = server.get(endpoints::CAMPAIGNS_VIEW).await;
        response.assert_status_ok();

        let document = Html::parse_document(&response.text());
        let card_selector = Selector::parse("a[href^='/campaigns/']").unwrap();

        assert_eq!(document.select(&card_selector).count(), 3);
    }

    #[tokio::test]
    async fn first_page_is_limited_to_page_size() {
        let server = get_test_server(12);

        let response = server.get(endpoints::CAMPAIGNS_VIEW).await;
        response.assert_status_ok();

        let document = Html::parse_document(&response.text());
        let card_selector = Selector::parse("a[href^='/campaigns/']").unwrap();

        assert_eq!(document.select(&card_selector).count(), 9);
    }

    #[tokio::test]
    async fn category_filter_narrows_results() {
        let server = get_test_server(4);

        let response = server
            .get(endpoints::CAMPAIGNS_VIEW)
            .add_query_param("category", "Feeding")
            .await;
        response.assert_status_ok();

        let document = Html::parse_document(&response.text());
        let card_selector = Selector::parse("a[href^='/campaigns/']").unwrap();

        assert_eq!(document.select(&card_selector).count(), 2);
    }

    #[tokio::test]
    async fn empty_listing_shows_message() {
        let server = get_test_server(0);

        let response = server.get(endpoints::CAMPAIGNS_VIEW).await;
        response.assert_status_ok();
        assert!(response.text().contains("No campaigns match your filters."));
    }
}

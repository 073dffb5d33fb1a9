//! The admin page for recording a ledger entry.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState,
    campaign::get_campaign_refs,
    endpoints,
    error::Error,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
    },
    ledger::core::EntryCategory,
    navigation::NavBar,
};

/// The state needed to display the new ledger entry page.
#[derive(Debug, Clone)]
pub struct NewEntryPageState {
    /// The database connection for listing campaigns.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NewEntryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the form for recording a ledger entry.
pub async fn get_new_entry_page(
    State(state): State<NewEntryPageState>,
) -> Result<Response, Error> {
    let campaign_refs = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_campaign_refs(&connection)?
    };

    let content = html! {
        (NavBar::new(endpoints::NEW_LEDGER_ENTRY_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-md"
            {
                h1 class="text-3xl font-bold mb-6" { "Record a ledger entry" }

                form
                    class="space-y-4"
                    hx-post=(endpoints::LEDGER_API)
                    hx-target-error="this"
                {
                    div
                    {
                        label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                        input
                            type="text"
                            name="description"
                            id="description"
                            placeholder="Cat food for the feeding route"
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }

                    div
                    {
                        label for="amount" class=(FORM_LABEL_STYLE) { "Amount (Rp)" }

                        input
                            type="number"
                            name="amount"
                            id="amount"
                            min="1"
                            step="1"
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }

                    div
                    {
                        label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                        select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE) required
                        {
                            option value=(EntryCategory::Income.as_str()) { "Income" }
                            option value=(EntryCategory::Expense.as_str()) { "Expense" }
                        }
                    }

                    div
                    {
                        label for="campaign_id" class=(FORM_LABEL_STYLE) { "Campaign" }

                        select name="campaign_id" id="campaign_id" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            option value="" { "No campaign (general fund)" }

                            @for (id, title) in &campaign_refs {
                                option value=(id) { (title) }
                            }
                        }
                    }

                    div
                    {
                        label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                        input
                            type="date"
                            name="date"
                            id="date"
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Record entry" }
                }
            }
        }
    };

    Ok(base("Record a ledger entry", &[], &content).into_response())
}

#[cfg(test)]
mod new_entry_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        campaign::{NewCampaign, create_campaign, create_campaign_table},
        endpoints,
    };

    use super::{NewEntryPageState, get_new_entry_page};

    #[tokio::test]
    async fn page_contains_form_with_campaign_options() {
        let connection = Connection::open_in_memory().expect("could not open database");
        create_campaign_table(&connection).expect("could not create campaign table");
        create_campaign(
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

        let state = NewEntryPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let app = Router::new()
            .route(endpoints::NEW_LEDGER_ENTRY_VIEW, get(get_new_entry_page))
            .with_state(state);
        let server = TestServer::new(app);

        let response = server.get(endpoints::NEW_LEDGER_ENTRY_VIEW).await;
        response.assert_status_ok();

        let document = Html::parse_document(&response.text());
        let form_selector =
            Selector::parse(&format!("form[hx-post='{}']", endpoints::LEDGER_API)).unwrap();
        let form = document
            .select(&form_selector)
            .next()
            .expect("page should contain a ledger entry form");

        let input_selector = Selector::parse("input, select").unwrap();
        let input_names: Vec<_> = form
            .select(&input_selector)
            .filter_map(|input| input.value().attr("name"))
            .collect();
        for name in ["description", "amount", "category", "campaign_id", "date"] {
            assert!(input_names.contains(&name), "missing input {name}");
        }

        assert!(response.text().contains("Feeding Program"));
    }
}

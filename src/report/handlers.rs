//! The route handler for the transparency page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState,
    campaign::{get_campaign_refs, get_campaign_titles},
    database_id::CampaignId,
    error::Error,
    ledger::get_ledger_entries,
    report::{
        charts::build_chart,
        engine::{
            ChartKind, Granularity, ReportEntry, bucket_by_period, category_slices,
            compare_periods, enrich_with_campaign_titles, filter_by_campaign, recent,
            sorted_by_newest, summarise,
        },
        view::{ReportPage, transparency_page},
    },
    timezone::get_local_date,
};

/// The state needed to build the fund report.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The local timezone as a canonical timezone name.
    pub local_timezone: String,
    /// The database connection for fetching the ledger snapshot.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the transparency page.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// The time window to bucket over.
    pub period: Option<Granularity>,
    /// "all" or a campaign ID.
    pub campaign: Option<String>,
    /// The kind of chart to render.
    pub chart: Option<ChartKind>,
}

/// Parse the campaign query parameter, treating "all", empty, and garbage as
/// no filter.
pub(super) fn parse_campaign_filter(raw: Option<&str>) -> Option<CampaignId> {
    raw.and_then(|raw| raw.parse().ok())
}

/// Fetch the ledger snapshot and resolve campaign titles.
pub(super) fn load_report_entries(state: &ReportState) -> Result<Vec<ReportEntry>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    load_report_entries_inner(&connection)
}

fn load_report_entries_inner(connection: &Connection) -> Result<Vec<ReportEntry>, Error> {
    let entries: Vec<ReportEntry> = get_ledger_entries(connection)?
        .into_iter()
        .map(ReportEntry::from)
        .collect();

    let mut campaign_ids: Vec<CampaignId> =
        entries.iter().filter_map(|entry| entry.campaign_id).collect();
    campaign_ids.sort_unstable();
    campaign_ids.dedup();

    let titles = get_campaign_titles(&campaign_ids, connection)?;

    Ok(enrich_with_campaign_titles(entries, &titles))
}

/// Display the fund transparency page.
pub async fn get_transparency_page(
    State(state): State<ReportState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let granularity = query.period.unwrap_or_default();
    let chart_kind = query.chart.unwrap_or_default();
    let campaign_filter = parse_campaign_filter(query.campaign.as_deref());

    let (entries, campaign_refs) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        (
            load_report_entries_inner(&connection)?,
            get_campaign_refs(&connection)?,
        )
    };

    let entries = filter_by_campaign(entries, campaign_filter);

    let totals = summarise(&entries);
    let comparison = compare_periods(&entries, granularity, today);
    let buckets = bucket_by_period(&entries, granularity);
    let (income_slices, _) = category_slices(&entries);

    let entries = sorted_by_newest(entries);
    let recent_entries = recent(&entries);

    let chart = build_chart(chart_kind, &buckets, &income_slices);

    Ok(transparency_page(ReportPage {
        granularity,
        chart_kind,
        campaign_filter,
        campaign_refs: &campaign_refs,
        totals,
        comparison,
        entries: &entries,
        recent: recent_entries,
        chart,
    })
    .into_response())
}

#[cfg(test)]
mod transparency_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        campaign::{NewCampaign, create_campaign, create_campaign_table},
        database_id::CampaignId,
        endpoints,
        ledger::{EntryCategory, NewLedgerEntry, create_ledger_entry, create_ledger_table},
    };

    use super::{ReportState, get_transparency_page, parse_campaign_filter};

    fn get_test_server() -> (TestServer, CampaignId) {
        let connection = Connection::open_in_memory().expect("could not open database");
        create_campaign_table(&connection).expect("could not create campaign table");
        create_ledger_table(&connection).expect("could not create ledger table");

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

        let today = date!(2024 - 06 - 10);
        create_ledger_entry(
            NewLedgerEntry {
                description: "Donation from the bake sale".to_owned(),
                amount: 5_000_000.0,
                category: EntryCategory::Income,
                campaign_id: None,
                date: date!(2024 - 06 - 03),
            },
            today,
            &connection,
        )
        .expect("could not create entry");
        create_ledger_entry(
            NewLedgerEntry {
                description: "Cat food for the feeding route".to_owned(),
                amount: 1_250_000.0,
                category: EntryCategory::Expense,
                campaign_id: Some(campaign.id),
                date: date!(2024 - 06 - 05),
            },
            today,
            &connection,
        )
        .expect("could not create entry");

        let state = ReportState {
            local_timezone: "Asia/Jakarta".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let app = Router::new()
            .route(endpoints::TRANSPARENCY_VIEW, get(get_transparency_page))
            .with_state(state);

        let server = TestServer::new(app);

        (server, campaign.id)
    }

    #[tokio::test]
    async fn page_shows_totals_and_entries() {
        let (server, _) = get_test_server();

        let response = server.get(endpoints::TRANSPARENCY_VIEW).await;
        response.assert_status_ok();

        let text = response.text();
        assert!(text.contains("Rp5.000.000"));
        assert!(text.contains("Rp1.250.000"));
        assert!(text.contains("Rp3.750.000"));
        assert!(text.contains("Donation from the bake sale"));
        assert!(text.contains("Feeding Program"));
        assert!(text.contains("General fund"));
    }

    #[tokio::test]
    async fn campaign_filter_narrows_entries() {
        let (server, campaign_id) = get_test_server();

        let response = server
            .get(endpoints::TRANSPARENCY_VIEW)
            .add_query_param("campaign", campaign_id)
            .await;
        response.assert_status_ok();

        let text = response.text();
        assert!(text.contains("Cat food for the feeding route"));
        assert!(!text.contains("Donation from the bake sale"));
    }

    #[tokio::test]
    async fn empty_ledger_shows_placeholder() {
        let connection = Connection::open_in_memory().expect("could not open database");
        create_campaign_table(&connection).expect("could not create campaign table");
        create_ledger_table(&connection).expect("could not create ledger table");

        let state = ReportState {
            local_timezone: "Asia/Jakarta".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let app = Router::new()
            .route(endpoints::TRANSPARENCY_VIEW, get(get_transparency_page))
            .with_state(state);
        let server = TestServer::new(app);

        let response = server.get(endpoints::TRANSPARENCY_VIEW).await;
        response.assert_status_ok();

        let text = response.text();
        assert!(text.contains("No transactions recorded yet."));
        assert!(text.contains("Rp0"));
    }

    #[tokio::test]
    async fn unknown_query_values_fall_back_to_defaults() {
        let (server, _) = get_test_server();

        let response = server
            .get(endpoints::TRANSPARENCY_VIEW)
            .add_query_param("campaign", "all")
            .await;

        response.assert_status_ok();
    }

    #[test]
    fn campaign_filter_parsing() {
        assert_eq!(parse_campaign_filter(None), None);
        assert_eq!(parse_campaign_filter(Some("all")), None);
        assert_eq!(parse_campaign_filter(Some("")), None);
        assert_eq!(parse_campaign_filter(Some("7")), Some(7));
    }
}

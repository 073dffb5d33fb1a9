//! The endpoint for creating a campaign. Admin only.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::html;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState,
    alert::Alert,
    auth::user::{UserID, require_admin},
    campaign::core::{Campaign, NewCampaign, create_campaign},
    endpoints,
    error::Error,
};

/// The state needed to create a campaign.
#[derive(Debug, Clone)]
pub struct CreateCampaignState {
    /// The database connection for creating campaigns.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCampaignState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data submitted from the new campaign form.
#[derive(Debug, Deserialize)]
pub struct CreateCampaignForm {
    /// The campaign's headline.
    pub title: String,
    /// A one or two sentence summary shown on campaign cards.
    pub short_description: String,
    /// The full campaign story shown on the detail page.
    pub description: String,
    /// The URL of the campaign's cover image.
    pub image_url: String,
    /// The amount of money the campaign aims to raise, in rupiah.
    pub target_amount: f64,
    /// The day the campaign opens.
    pub start_date: Date,
    /// The day the campaign closes.
    pub end_date: Date,
    /// The kind of work the campaign funds.
    pub category: String,
    /// Where the campaign operates.
    pub location: String,
    /// Present when the "featured" checkbox is ticked.
    pub featured: Option<String>,
}

/// Create a campaign and redirect to its detail page.
pub async fn create_campaign_endpoint(
    State(state): State<CreateCampaignState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<CreateCampaignForm>,
) -> Response {
    if form.end_date < form.start_date {
        return (
            StatusCode::BAD_REQUEST,
            Alert::error(
                "Invalid campaign dates",
                "The end date must not be before the start date.",
            )
            .into_html(),
        )
            .into_response();
    }

    match create_campaign_for_admin(&state, user_id, form) {
        Ok(campaign) => {
            let detail_url = endpoints::format_endpoint(endpoints::CAMPAIGN_VIEW, campaign.id);

            (
                StatusCode::SEE_OTHER,
                HxRedirect(detail_url),
                html! {}.into_string(),
            )
                .into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}

fn create_campaign_for_admin(
    state: &CreateCampaignState,
    user_id: UserID,
    form: CreateCampaignForm,
) -> Result<Campaign, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    require_admin(user_id, &connection)?;

    create_campaign(
        NewCampaign {
            title: form.title,
            short_description: form.short_description,
            description: form.description,
            image_url: form.image_url,
            target_amount: form.target_amount,
            start_date: form.start_date,
            end_date: form.end_date,
            category: form.category,
            location: form.location,
            featured: form.featured.is_some(),
        },
        &connection,
    )
}

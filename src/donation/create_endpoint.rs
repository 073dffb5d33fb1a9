//! The endpoint that accepts a donation.
//!
//! There is no external payment gateway wired up, so donations are marked
//! as paid as soon as they are recorded.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState,
    database_id::CampaignId,
    donation::core::{Donation, NewDonation, complete_donation, create_donation},
    endpoints,
    error::Error,
};

/// The state needed to accept a donation.
#[derive(Debug, Clone)]
pub struct CreateDonationState {
    /// The database connection for recording donations.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateDonationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data submitted from the donation form.
#[derive(Debug, Deserialize)]
pub struct CreateDonationForm {
    /// The campaign the donation goes to.
    pub campaign_id: CampaignId,
    /// The amount donated, in rupiah.
    pub amount: f64,
    /// The donor's name. May be empty for anonymous donations.
    pub donor_name: Option<String>,
    /// The donor's email address.
    pub donor_email: String,
    /// An optional message of support from the donor.
    pub message: Option<String>,
    /// Present when the "donate anonymously" checkbox is ticked.
    pub anonymous: Option<String>,
}

/// Record a donation and redirect back to the campaign page.
pub async fn create_donation_endpoint(
    State(state): State<CreateDonationState>,
    Form(form): Form<CreateDonationForm>,
) -> Response {
    let campaign_id = form.campaign_id;

    match record_donation(&state, form) {
        Ok(_) => (
            HxRedirect(endpoints::format_endpoint(
                endpoints::CAMPAIGN_VIEW,
                campaign_id,
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn record_donation(
    state: &CreateDonationState,
    form: CreateDonationForm,
) -> Result<Donation, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let message = form.message.filter(|message| !message.trim().is_empty());

    let donation = create_donation(
        NewDonation {
            amount: form.amount,
            campaign_id: form.campaign_id,
            donor_name: form.donor_name.unwrap_or_default(),
            donor_email: form.donor_email,
            message,
            anonymous: form.anonymous.is_some(),
        },
        &connection,
    )?;

    complete_donation(donation.id, &connection)
}

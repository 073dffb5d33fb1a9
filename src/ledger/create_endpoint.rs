//! The endpoint for recording a ledger entry. Admin only.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState,
    auth::user::{UserID, require_admin},
    database_id::CampaignId,
    endpoints,
    error::Error,
    ledger::core::{EntryCategory, LedgerEntry, NewLedgerEntry, create_ledger_entry},
    timezone::get_local_date,
};

/// The state needed to record a ledger entry.
#[derive(Debug, Clone)]
pub struct CreateLedgerEntryState {
    /// The local timezone as a canonical timezone name.
    pub local_timezone: String,
    /// The database connection for recording entries.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateLedgerEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data submitted from the ledger entry form.
#[derive(Debug, Deserialize)]
pub struct CreateLedgerEntryForm {
    /// What the money was for.
    pub description: String,
    /// The amount of money that moved, in rupiah.
    pub amount: f64,
    /// "income" or "expense".
    pub category: String,
    /// The campaign the entry belongs to. An empty string means the general
    /// fund.
    pub campaign_id: Option<String>,
    /// The day the money moved.
    pub date: Date,
}

/// Record a ledger entry and redirect to the transparency page.
pub async fn create_ledger_entry_endpoint(
    State(state): State<CreateLedgerEntryState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<CreateLedgerEntryForm>,
) -> Response {
    match record_entry(&state, user_id, form) {
        Ok(_) => (
            HxRedirect(endpoints::TRANSPARENCY_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn record_entry(
    state: &CreateLedgerEntryState,
    user_id: UserID,
    form: CreateLedgerEntryForm,
) -> Result<LedgerEntry, Error> {
    let today = get_local_date(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let category = EntryCategory::parse(&form.category)?;

    let campaign_id: Option<CampaignId> = match form.campaign_id.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(raw.parse().map_err(|_| Error::NotFound)?),
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    require_admin(user_id, &connection)?;

    create_ledger_entry(
        NewLedgerEntry {
            description: form.description,
            amount: form.amount,
            category,
            campaign_id,
            date: form.date,
        },
        today,
        &connection,
    )
}

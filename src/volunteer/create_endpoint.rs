//! The endpoint that accepts a volunteer application.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState,
    alert::Alert,
    error::Error,
    volunteer::core::{NewVolunteer, Volunteer, create_volunteer},
};

/// The state needed to accept a volunteer application.
#[derive(Debug, Clone)]
pub struct CreateVolunteerState {
    /// The database connection for recording applications.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateVolunteerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data submitted from the volunteer application form.
#[derive(Debug, Deserialize)]
pub struct CreateVolunteerForm {
    /// The applicant's first name.
    pub first_name: String,
    /// The applicant's last name.
    pub last_name: String,
    /// The applicant's email address.
    pub email: String,
    /// The applicant's phone number.
    pub phone_number: String,
    /// Where the applicant lives.
    pub address: String,
    /// The area the applicant wants to help with.
    pub area_of_interest: String,
    /// Any relevant experience the applicant has.
    pub experience: Option<String>,
}

/// Record a volunteer application and confirm with an alert.
pub async fn create_volunteer_endpoint(
    State(state): State<CreateVolunteerState>,
    Form(form): Form<CreateVolunteerForm>,
) -> Response {
    match record_application(&state, form) {
        Ok(volunteer) => (
            StatusCode::CREATED,
            Alert::success(
                "Application received",
                &format!(
                    "Thank you {}! We will be in touch about volunteering for {}.",
                    volunteer.first_name, volunteer.area_of_interest
                ),
            )
            .into_html(),
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn record_application(
    state: &CreateVolunteerState,
    form: CreateVolunteerForm,
) -> Result<Volunteer, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let experience = form
        .experience
        .filter(|experience| !experience.trim().is_empty());

    create_volunteer(
        NewVolunteer {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            phone_number: form.phone_number,
            address: form.address,
            area_of_interest: form.area_of_interest,
            experience,
        },
        &connection,
    )
}

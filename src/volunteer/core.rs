//! The volunteer application model and its database operations.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{database_id::VolunteerId, error::Error};

/// The review state of a volunteer application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplicationStatus {
    /// The application has not been reviewed yet.
    #[default]
    Pending,
    /// The application was accepted.
    Approved,
    /// The application was declined.
    Rejected,
}

impl ApplicationStatus {
    /// The string stored in the database for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Parse a status string from the database.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        match raw {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(Error::InvalidCategory(raw.to_owned())),
        }
    }
}

/// The areas a volunteer can apply to help with.
pub const AREAS_OF_INTEREST: [&str; 6] = [
    "Cat Care",
    "Fostering",
    "Adoption Events",
    "Fundraising",
    "Transport",
    "Social Media",
];

/// A volunteer application.
#[derive(Debug, Clone, PartialEq)]
pub struct Volunteer {
    /// The application's ID in the database.
    pub id: VolunteerId,
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
    /// The review state of the application.
    pub status: ApplicationStatus,
    /// When the application was submitted.
    pub created_at: OffsetDateTime,
}

/// The values needed to create a volunteer application.
#[derive(Debug, Clone)]
pub struct NewVolunteer {
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

/// Create the volunteer table.
pub fn create_volunteer_table(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS volunteer (
            id INTEGER PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone_number TEXT NOT NULL,
            address TEXT NOT NULL,
            area_of_interest TEXT NOT NULL,
            experience TEXT,
            status TEXT NOT NULL DEFAULT 'pending',
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Insert a volunteer application into the database.
///
/// # Errors
/// Returns [Error::EmptyField] if a required field is blank, or
/// [Error::InvalidEmail] if the email does not look like an email address.
pub fn create_volunteer(
    volunteer: NewVolunteer,
    connection: &Connection,
) -> Result<Volunteer, Error> {
    let first_name = volunteer.first_name.trim();
    if first_name.is_empty() {
        return Err(Error::EmptyField("first name"));
    }

    let last_name = volunteer.last_name.trim();
    if last_name.is_empty() {
        return Err(Error::EmptyField("last name"));
    }

    let email = volunteer.email.trim();
    if !email.contains('@') {
        return Err(Error::InvalidEmail(email.to_owned()));
    }

    let phone_number = volunteer.phone_number.trim();
    if phone_number.is_empty() {
        return Err(Error::EmptyField("phone number"));
    }

    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO volunteer (
            first_name, last_name, email, phone_number, address, area_of_interest,
            experience, status, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        (
            first_name,
            last_name,
            email,
            phone_number,
            &volunteer.address,
            &volunteer.area_of_interest,
            &volunteer.experience,
            ApplicationStatus::Pending.as_str(),
            created_at,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Volunteer {
        id,
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: email.to_owned(),
        phone_number: phone_number.to_owned(),
        address: volunteer.address,
        area_of_interest: volunteer.area_of_interest,
        experience: volunteer.experience,
        status: ApplicationStatus::Pending,
        created_at,
    })
}

/// Retrieve every volunteer application, newest first.
pub fn get_volunteers(connection: &Connection) -> Result<Vec<Volunteer>, Error> {
    let volunteers = connection
        .prepare(
            "SELECT id, first_name, last_name, email, phone_number, address, area_of_interest, \
            experience, status, created_at FROM volunteer ORDER BY created_at DESC, id DESC",
        )?
        .query_map([], map_volunteer_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(volunteers)
}

fn map_volunteer_row(row: &Row) -> Result<Volunteer, rusqlite::Error> {
    let raw_status: String = row.get(8)?;
    let status = ApplicationStatus::parse(&raw_status).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            8,
            rusqlite::types::Type::Text,
            format!("invalid application status {raw_status}").into(),
        )
    })?;

    Ok(Volunteer {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone_number: row.get(4)?,
        address: row.get(5)?,
        area_of_interest: row.get(6)?,
        experience: row.get(7)?,
        status,
        created_at: row.get(9)?,
    })
}

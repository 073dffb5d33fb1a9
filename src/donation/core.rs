//! The donation model and its database operations.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    campaign::add_to_campaign_amount,
    database_id::{CampaignId, DonationId},
    error::Error,
};

/// Where a donation is in the payment flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentStatus {
    /// The donation has been submitted but not yet paid.
    #[default]
    Pending,
    /// The payment went through.
    Completed,
    /// The payment failed or was abandoned.
    Failed,
}

impl PaymentStatus {
    /// The string stored in the database for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }

    /// Parse a status string from the database.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        match raw {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            _ => Err(Error::InvalidCategory(raw.to_owned())),
        }
    }
}

/// A donation to a campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct Donation {
    /// The donation's ID in the database.
    pub id: DonationId,
    /// The amount donated, in rupiah.
    pub amount: f64,
    /// The campaign the donation goes to.
    pub campaign_id: CampaignId,
    /// The donor's name, or "Anonymous" for anonymous donations.
    pub donor_name: String,
    /// The donor's email address.
    pub donor_email: String,
    /// An optional message of support from the donor.
    pub message: Option<String>,
    /// Whether the donor chose to hide their name.
    pub anonymous: bool,
    /// Where the donation is in the payment flow.
    pub payment_status: PaymentStatus,
    /// When the donation was submitted.
    pub created_at: OffsetDateTime,
}

/// The values needed to create a donation.
#[derive(Debug, Clone)]
pub struct NewDonation {
    /// The amount donated, in rupiah.
    pub amount: f64,
    /// The campaign the donation goes to.
    pub campaign_id: CampaignId,
    /// The donor's name.
    pub donor_name: String,
    /// The donor's email address.
    pub donor_email: String,
    /// An optional message of support from the donor.
    pub message: Option<String>,
    /// Whether the donor chose to hide their name.
    pub anonymous: bool,
}

/// Create the donation table.
pub fn create_donation_table(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS donation (
            id INTEGER PRIMARY KEY,
            amount REAL NOT NULL,
            campaign_id INTEGER NOT NULL REFERENCES campaign(id),
            donor_name TEXT NOT NULL,
            donor_email TEXT NOT NULL,
            message TEXT,
            anonymous INTEGER NOT NULL DEFAULT 0,
            payment_status TEXT NOT NULL DEFAULT 'pending',
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Insert a pending donation into the database.
///
/// Anonymous donations have their name replaced with "Anonymous" before
/// being stored so that the donor's name cannot leak later.
///
/// # Errors
/// Returns [Error::InvalidAmount] if the amount is not a positive number,
/// [Error::EmptyField] if a named donation has a blank name, or
/// [Error::InvalidEmail] if the email does not look like an email address.
pub fn create_donation(donation: NewDonation, connection: &Connection) -> Result<Donation, Error> {
    if !donation.amount.is_finite() || donation.amount <= 0.0 {
        return Err(Error::InvalidAmount(donation.amount));
    }

    let donor_name = if donation.anonymous {
        "Anonymous".to_owned()
    } else {
        let name = donation.donor_name.trim();
        if name.is_empty() {
            return Err(Error::EmptyField("name"));
        }
        name.to_owned()
    };

    let donor_email = donation.donor_email.trim();
    if !donor_email.contains('@') {
        return Err(Error::InvalidEmail(donor_email.to_owned()));
    }

    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO donation (
            amount, campaign_id, donor_name, donor_email, message, anonymous,
            payment_status, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        (
            donation.amount,
            donation.campaign_id,
            &donor_name,
            donor_email,
            &donation.message,
            donation.anonymous,
            PaymentStatus::Pending.as_str(),
            created_at,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Donation {
        id,
        amount: donation.amount,
        campaign_id: donation.campaign_id,
        donor_name,
        donor_email: donor_email.to_owned(),
        message: donation.message,
        anonymous: donation.anonymous,
        payment_status: PaymentStatus::Pending,
        created_at,
    })
}

/// Mark a donation as paid and add its amount to the campaign's raised total.
///
/// Completing a donation twice is a no-op, so a payment callback that is
/// retried does not double count the amount.
///
/// # Errors
/// Returns [Error::NotFound] if there is no donation with that ID.
pub fn complete_donation(id: DonationId, connection: &Connection) -> Result<Donation, Error> {
    let donation = get_donation(id, connection)?;

    if donation.payment_status == PaymentStatus::Completed {
        return Ok(donation);
    }

    connection.execute(
        "UPDATE donation SET payment_status = ?1 WHERE id = ?2",
        (PaymentStatus::Completed.as_str(), id),
    )?;

    add_to_campaign_amount(donation.campaign_id, donation.amount, connection)?;

    Ok(Donation {
        payment_status: PaymentStatus::Completed,
        ..donation
    })
}

/// Retrieve a donation by its ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no donation with that ID.
pub fn get_donation(id: DonationId, connection: &Connection) -> Result<Donation, Error> {
    let donation = connection
        .prepare(
            "SELECT id, amount, campaign_id, donor_name, donor_email, message, anonymous, \
            payment_status, created_at FROM donation WHERE id = ?1",
        )?
        .query_row([id], map_donation_row)?;

    Ok(donation)
}

/// Retrieve the most recent completed donations for a campaign, newest first.
pub fn get_recent_donations(
    campaign_id: CampaignId,
    limit: u64,
    connection: &Connection,
) -> Result<Vec<Donation>, Error> {
    let donations = connection
        .prepare(&format!(
            "SELECT id, amount, campaign_id, donor_name, donor_email, message, anonymous, \
            payment_status, created_at FROM donation \
            WHERE campaign_id = ?1 AND payment_status = 'completed' \
            ORDER BY created_at DESC, id DESC LIMIT {limit}"
        ))?
        .query_map([campaign_id], map_donation_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(donations)
}

fn map_donation_row(row: &Row) -> Result<Donation, rusqlite::Error> {
    let raw_status: String = row.get(7)?;
    let payment_status = PaymentStatus::parse(&raw_status).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            7,
            rusqlite::types::Type::Text,
            format!("invalid payment status {raw_status}").into(),
        )
    })?;

    Ok(Donation {
        id: row.get(0)?,
        amount: row.get(1)?,
        campaign_id: row.get(2)?,
        donor_name: row.get(3)?,
        donor_email: row.get(4)?,
        message: row.get(5)?,
        anonymous: row.get(6)?,
        payment_status,
        created_at: row.get(8)?,
    })
}

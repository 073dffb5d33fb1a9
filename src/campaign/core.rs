//! The campaign model and its database operations.

use std::collections::HashMap;

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::Date;

use crate::{database_id::CampaignId, error::Error};

/// The lifecycle state of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CampaignStatus {
    /// The campaign is accepting donations.
    #[default]
    Active,
    /// The campaign reached its goal or its end date.
    Completed,
    /// The campaign was cancelled by an admin.
    Cancelled,
}

impl CampaignStatus {
    /// The string stored in the database for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a status string from the database or a form.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        match raw {
            "active" => Ok(CampaignStatus::Active),
            "completed" => Ok(CampaignStatus::Completed),
            "cancelled" => Ok(CampaignStatus::Cancelled),
            _ => Err(Error::InvalidCategory(raw.to_owned())),
        }
    }
}

/// A fundraising campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    /// The campaign's ID in the database.
    pub id: CampaignId,
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
    /// The amount of money raised so far, in rupiah.
    pub current_amount: f64,
    /// The day the campaign opened.
    pub start_date: Date,
    /// The day the campaign closes.
    pub end_date: Date,
    /// The kind of work the campaign funds, e.g. "Medical" or "Feeding".
    pub category: String,
    /// Where the campaign operates, e.g. "Jakarta Selatan".
    pub location: String,
    /// The lifecycle state of the campaign.
    pub status: CampaignStatus,
    /// Whether the campaign is highlighted on the home page.
    pub featured: bool,
}

impl Campaign {
    /// How much of the target has been raised, from 0 to 100.
    ///
    /// Capped at 100 so that overfunded campaigns do not overflow the
    /// progress bar.
    pub fn percent_funded(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }

        (self.current_amount / self.target_amount * 100.0).min(100.0)
    }

    /// How many days remain until the end date, or zero if it has passed.
    pub fn days_left(&self, today: Date) -> i64 {
        (self.end_date - today).whole_days().max(0)
    }
}

/// The values needed to create a campaign.
///
/// The current amount always starts at zero.
#[derive(Debug, Clone)]
pub struct NewCampaign {
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
    /// Whether the campaign is highlighted on the home page.
    pub featured: bool,
}

/// Filters for listing campaigns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignFilter {
    /// Only campaigns with this category.
    pub category: Option<String>,
    /// Only campaigns whose title or short description contains this text.
    pub search: Option<String>,
    /// Only featured campaigns.
    pub featured_only: bool,
}

/// Create the campaign table.
pub fn create_campaign_table(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS campaign (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            short_description TEXT NOT NULL,
            description TEXT NOT NULL,
            image_url TEXT NOT NULL,
            target_amount REAL NOT NULL,
            current_amount REAL NOT NULL DEFAULT 0,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            category TEXT NOT NULL,
            location TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            featured INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    Ok(())
}

/// Insert a campaign into the database.
///
/// # Errors
/// Returns [Error::EmptyField] if the title is blank, or
/// [Error::InvalidAmount] if the target amount is not a positive number.
pub fn create_campaign(campaign: NewCampaign, connection: &Connection) -> Result<Campaign, Error> {
    if campaign.title.trim().is_empty() {
        return Err(Error::EmptyField("title"));
    }

    if !campaign.target_amount.is_finite() || campaign.target_amount <= 0.0 {
        return Err(Error::InvalidAmount(campaign.target_amount));
    }

    connection.execute(
        "INSERT INTO campaign (
            title, short_description, description, image_url, target_amount,
            current_amount, start_date, end_date, category, location, status, featured
        ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7, ?8, ?9, ?10, ?11)",
        (
            campaign.title.trim(),
            &campaign.short_description,
            &campaign.description,
            &campaign.image_url,
            campaign.target_amount,
            campaign.start_date,
            campaign.end_date,
            &campaign.category,
            &campaign.location,
            CampaignStatus::Active.as_str(),
            campaign.featured,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Campaign {
        id,
        title: campaign.title.trim().to_owned(),
        short_description: campaign.short_description,
        description: campaign.description,
        image_url: campaign.image_url,
        target_amount: campaign.target_amount,
        current_amount: 0.0,
        start_date: campaign.start_date,
        end_date: campaign.end_date,
        category: campaign.category,
        location: campaign.location,
        status: CampaignStatus::Active,
        featured: campaign.featured,
    })
}

const CAMPAIGN_COLUMNS: &str = "id, title, short_description, description, image_url, \
    target_amount, current_amount, start_date, end_date, category, location, status, featured";

/// Retrieve a campaign by its ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no campaign with that ID.
pub fn get_campaign(id: CampaignId, connection: &Connection) -> Result<Campaign, Error> {
    let campaign = connection
        .prepare(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaign WHERE id = ?1"
        ))?
        .query_row([id], map_campaign_row)?;

    Ok(campaign)
}

/// Retrieve a page of campaigns matching `filter`, newest first.
///
/// Returns the page of campaigns and the total number of campaigns matching
/// the filter, which the caller needs to build pagination controls.
pub fn get_campaigns(
    filter: &CampaignFilter,
    page: u64,
    page_size: u64,
    connection: &Connection,
) -> Result<(Vec<Campaign>, u64), Error> {
    let mut conditions = Vec::new();
    let mut parameters: Vec<Value> = Vec::new();

    if let Some(category) = &filter.category {
        conditions.push("category = ?");
        parameters.push(Value::from(category.clone()));
    }

    if let Some(search) = &filter.search {
        conditions.push("(title LIKE '%' || ? || '%' OR short_description LIKE '%' || ? || '%')");
        parameters.push(Value::from(search.clone()));
        parameters.push(Value::from(search.clone()));
    }

    if filter.featured_only {
        conditions.push("featured = 1");
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let total: u64 = connection
        .prepare(&format!("SELECT COUNT(id) FROM campaign {where_clause}"))?
        .query_row(params_from_iter(parameters.iter()), |row| {
            row.get::<_, i64>(0).map(|total| total as u64)
        })?;

    // Page numbers start at one.
    let offset = page.saturating_sub(1) * page_size;
    let campaigns = connection
        .prepare(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaign {where_clause} \
            ORDER BY start_date DESC, id DESC LIMIT {page_size} OFFSET {offset}"
        ))?
        .query_map(params_from_iter(parameters.iter()), map_campaign_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok((campaigns, total))
}

/// Retrieve up to `limit` featured campaigns for the home page.
pub fn get_featured_campaigns(limit: u64, connection: &Connection) -> Result<Vec<Campaign>, Error> {
    let campaigns = connection
        .prepare(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaign WHERE featured = 1 AND status = 'active' \
            ORDER BY start_date DESC, id DESC LIMIT {limit}"
        ))?
        .query_map([], map_campaign_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(campaigns)
}

/// Look up the titles of many campaigns in one query.
///
/// IDs that do not exist are simply absent from the result.
pub fn get_campaign_titles(
    ids: &[CampaignId],
    connection: &Connection,
) -> Result<HashMap<CampaignId, String>, Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let titles = connection
        .prepare(&format!(
            "SELECT id, title FROM campaign WHERE id IN ({placeholders})"
        ))?
        .query_map(params_from_iter(ids.iter()), |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?
        .collect::<Result<HashMap<_, _>, _>>()?;

    Ok(titles)
}

/// Retrieve the ID and title of every campaign, for select inputs.
pub fn get_campaign_refs(connection: &Connection) -> Result<Vec<(CampaignId, String)>, Error> {
    let refs = connection
        .prepare("SELECT id, title FROM campaign ORDER BY title ASC")?
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(refs)
}

/// The distinct campaign categories, for the filter dropdown.
pub fn get_campaign_categories(connection: &Connection) -> Result<Vec<String>, Error> {
    let categories = connection
        .prepare("SELECT DISTINCT category FROM campaign ORDER BY category ASC")?
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(categories)
}

/// Add `amount` to a campaign's raised total.
///
/// # Errors
/// Returns [Error::NotFound] if there is no campaign with that ID.
pub fn add_to_campaign_amount(
    id: CampaignId,
    amount: f64,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_updated = connection.execute(
        "UPDATE campaign SET current_amount = current_amount + ?1 WHERE id = ?2",
        (amount, id),
    )?;

    if rows_updated == 0 {
        Err(Error::NotFound)
    } else {
        Ok(())
    }
}

fn map_campaign_row(row: &Row) -> Result<Campaign, rusqlite::Error> {
    let raw_status: String = row.get(11)?;
    let status = CampaignStatus::parse(&raw_status).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            11,
            rusqlite::types::Type::Text,
            format!("invalid campaign status {raw_status}").into(),
        )
    })?;

    Ok(Campaign {
        id: row.get(0)?,
        title: row.get(1)?,
        short_description: row.get(2)?,
        description: row.get(3)?,
        image_url: row.get(4)?,
        target_amount: row.get(5)?,
        current_amount: row.get(6)?,
        start_date: row.get(7)?,
        end_date: row.get(8)?,
        category: row.get(9)?,
        location: row.get(10)?,
        status,
        featured: row.get(12)?,
    })
}

//! The fund ledger: every rupiah that enters or leaves the community fund.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    database_id::{CampaignId, LedgerEntryId},
    error::Error,
};

/// Whether a ledger entry records money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryCategory {
    /// Money entering the fund, e.g. a donation or a grant.
    Income,
    /// Money leaving the fund, e.g. vet bills or cat food.
    Expense,
}

impl EntryCategory {
    /// The string stored in the database for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryCategory::Income => "income",
            EntryCategory::Expense => "expense",
        }
    }

    /// Parse a category string from the database or a form.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        match raw {
            "income" => Ok(EntryCategory::Income),
            "expense" => Ok(EntryCategory::Expense),
            _ => Err(Error::InvalidCategory(raw.to_owned())),
        }
    }
}

/// One movement of money in the community fund.
///
/// Amounts are always stored as non-negative numbers. Whether the money came
/// in or went out is carried by the category.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    /// The entry's ID in the database.
    pub id: LedgerEntryId,
    /// What the money was for.
    pub description: String,
    /// The amount of money that moved, in rupiah. Never negative.
    pub amount: f64,
    /// Whether the money came in or went out.
    pub category: EntryCategory,
    /// The campaign the entry belongs to, if any.
    pub campaign_id: Option<CampaignId>,
    /// The day the money moved.
    pub date: Date,
}

/// The values needed to create a ledger entry.
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    /// What the money was for.
    pub description: String,
    /// The amount of money that moved, in rupiah.
    pub amount: f64,
    /// Whether the money came in or went out.
    pub category: EntryCategory,
    /// The campaign the entry belongs to, if any.
    pub campaign_id: Option<CampaignId>,
    /// The day the money moved.
    pub date: Date,
}

/// Create the ledger entry table.
pub fn create_ledger_table(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS ledger_entry (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            category TEXT NOT NULL,
            campaign_id INTEGER REFERENCES campaign(id),
            date TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Insert a ledger entry into the database.
///
/// `today` is the current date in the server's local timezone. Entries record
/// money that has already moved, so dates after `today` are rejected.
///
/// # Errors
/// Returns [Error::EmptyField] if the description is blank,
/// [Error::InvalidAmount] if the amount is not a positive number, or
/// [Error::FutureDate] if the date is after `today`.
pub fn create_ledger_entry(
    entry: NewLedgerEntry,
    today: Date,
    connection: &Connection,
) -> Result<LedgerEntry, Error> {
    let description = entry.description.trim();
    if description.is_empty() {
        return Err(Error::EmptyField("description"));
    }

    if !entry.amount.is_finite() || entry.amount <= 0.0 {
        return Err(Error::InvalidAmount(entry.amount));
    }

    if entry.date > today {
        return Err(Error::FutureDate(entry.date));
    }

    connection.execute(
        "INSERT INTO ledger_entry (description, amount, category, campaign_id, date) \
        VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            description,
            entry.amount,
            entry.category.as_str(),
            entry.campaign_id,
            entry.date,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(LedgerEntry {
        id,
        description: description.to_owned(),
        amount: entry.amount,
        category: entry.category,
        campaign_id: entry.campaign_id,
        date: entry.date,
    })
}

/// Retrieve every ledger entry.
///
/// The order rows come back in is not significant, the report engine sorts
/// entries as it needs them.
pub fn get_ledger_entries(connection: &Connection) -> Result<Vec<LedgerEntry>, Error> {
    let entries = connection
        .prepare("SELECT id, description, amount, category, campaign_id, date FROM ledger_entry")?
        .query_map([], map_ledger_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(entries)
}

fn map_ledger_row(row: &Row) -> Result<LedgerEntry, rusqlite::Error> {
    let raw_category: String = row.get(3)?;
    let category = EntryCategory::parse(&raw_category).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("invalid entry category {raw_category}").into(),
        )
    })?;

    Ok(LedgerEntry {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        category,
        campaign_id: row.get(4)?,
        date: row.get(5)?,
    })
}

#[cfg(test)]
mod ledger_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{campaign::create_campaign_table, error::Error};

    use super::{
        EntryCategory, NewLedgerEntry, create_ledger_entry, create_ledger_table,
        get_ledger_entries,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().expect("could not open database");
        create_campaign_table(&connection).expect("could not create campaign table");
        create_ledger_table(&connection).expect("could not create ledger table");

        connection
    }

    fn new_entry(amount: f64, category: EntryCategory) -> NewLedgerEntry {
        NewLedgerEntry {
            description: "Cat food for the feeding route".to_owned(),
            amount,
            category,
            campaign_id: None,
            date: date!(2024 - 06 - 05),
        }
    }

    const TODAY: time::Date = date!(2024 - 06 - 10);

    #[test]
    fn create_then_get_returns_entry() {
        let connection = get_test_connection();

        let created =
            create_ledger_entry(new_entry(1_250_000.0, EntryCategory::Expense), TODAY, &connection)
                .expect("could not create entry");
        let entries = get_ledger_entries(&connection).expect("could not list entries");

        assert_eq!(entries, vec![created]);
    }

    #[test]
    fn create_rejects_blank_description() {
        let connection = get_test_connection();

        let mut entry = new_entry(1_250_000.0, EntryCategory::Expense);
        entry.description = "  ".to_owned();

        let error = create_ledger_entry(entry, TODAY, &connection)
            .expect_err("blank description should be rejected");

        assert_eq!(error, Error::EmptyField("description"));
    }

    #[test]
    fn create_rejects_non_positive_amount() {
        let connection = get_test_connection();

        let error = create_ledger_entry(
            new_entry(-500.0, EntryCategory::Expense),
            TODAY,
            &connection,
        )
        .expect_err("negative amount should be rejected");

        assert_eq!(error, Error::InvalidAmount(-500.0));
    }

    #[test]
    fn create_rejects_future_date() {
        let connection = get_test_connection();

        let mut entry = new_entry(1_250_000.0, EntryCategory::Income);
        entry.date = date!(2024 - 06 - 11);

        let error = create_ledger_entry(entry, TODAY, &connection)
            .expect_err("future date should be rejected");

        assert_eq!(error, Error::FutureDate(date!(2024 - 06 - 11)));
    }

    #[test]
    fn create_accepts_entry_dated_today() {
        let connection = get_test_connection();

        let mut entry = new_entry(1_250_000.0, EntryCategory::Income);
        entry.date = TODAY;

        assert!(create_ledger_entry(entry, TODAY, &connection).is_ok());
    }

    #[test]
    fn category_round_trips_through_database() {
        let connection = get_test_connection();

        create_ledger_entry(new_entry(5_000_000.0, EntryCategory::Income), TODAY, &connection)
            .unwrap();
        create_ledger_entry(new_entry(1_250_000.0, EntryCategory::Expense), TODAY, &connection)
            .unwrap();

        let entries = get_ledger_entries(&connection).unwrap();
        let categories: Vec<_> = entries.iter().map(|entry| entry.category).collect();

        assert!(categories.contains(&EntryCategory::Income));
        assert!(categories.contains(&EntryCategory::Expense));
    }

    #[test]
    fn parse_rejects_unknown_category() {
        let error =
            EntryCategory::parse("transfer").expect_err("unknown category should be rejected");

        assert_eq!(error, Error::InvalidCategory("transfer".to_owned()));
    }
}

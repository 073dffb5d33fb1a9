//! Database initialisation.

use rusqlite::Connection;

use crate::{
    Error, auth::user::create_user_table, campaign::create_campaign_table,
    donation::create_donation_table, ledger::create_ledger_table,
    volunteer::create_volunteer_table,
};

/// Create all the tables the application needs.
///
/// Each `create_*_table` call is a no-op if the table already exists, so this
/// is safe to run on every start-up.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_user_table(connection)?;
    create_campaign_table(connection)?;
    create_donation_table(connection)?;
    create_volunteer_table(connection)?;
    create_ledger_table(connection)?;

    Ok(())
}

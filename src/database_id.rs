//! Integer ID aliases for rows in the application database.
//!
//! Using distinct aliases makes function signatures self-documenting while
//! keeping the rusqlite bindings simple (they are all plain `i64` rowids).

/// A generic SQLite rowid.
pub type DatabaseId = i64;

/// The rowid of a campaign.
pub type CampaignId = DatabaseId;

/// The rowid of a donation.
pub type DonationId = DatabaseId;

/// The rowid of a volunteer application.
pub type VolunteerId = DatabaseId;

/// The rowid of a ledger entry.
pub type LedgerEntryId = DatabaseId;

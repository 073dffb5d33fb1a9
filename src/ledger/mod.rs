//! The community fund ledger: the model, the admin entry form, and the
//! endpoint that records entries.

mod core;
mod create_endpoint;
mod new_entry_page;

pub use core::{
    EntryCategory, LedgerEntry, NewLedgerEntry, create_ledger_entry, create_ledger_table,
    get_ledger_entries,
};
pub use create_endpoint::{CreateLedgerEntryState, create_ledger_entry_endpoint};
pub use new_entry_page::{NewEntryPageState, get_new_entry_page};

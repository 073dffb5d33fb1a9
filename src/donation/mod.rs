//! Donations to campaigns: the model, the donation form, and the endpoint
//! that records payments.

mod core;
mod create_endpoint;
mod donate_page;

pub use core::{
    Donation, NewDonation, PaymentStatus, complete_donation, create_donation,
    create_donation_table, get_donation, get_recent_donations,
};
pub use create_endpoint::{CreateDonationState, create_donation_endpoint};
pub use donate_page::{DonatePageState, get_donate_page};

//! Volunteer applications: the model, the public form, and the endpoint that
//! records applications.

mod core;
mod create_endpoint;
mod volunteer_page;

pub use core::{
    AREAS_OF_INTEREST, ApplicationStatus, NewVolunteer, Volunteer, create_volunteer,
    create_volunteer_table, get_volunteers,
};
pub use create_endpoint::{CreateVolunteerState, create_volunteer_endpoint};
pub use volunteer_page::get_volunteer_page;

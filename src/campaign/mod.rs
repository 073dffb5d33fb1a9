//! Fundraising campaigns: the model, the public pages, and the admin
//! endpoints for creating campaigns.

mod campaign_page;
mod campaigns_page;
mod core;
mod create_endpoint;
mod new_campaign_page;

pub use campaign_page::{CampaignPageState, get_campaign_page};
pub use campaigns_page::{CampaignsPageState, campaign_card, get_campaigns_page};
pub use core::{
    Campaign, CampaignFilter, CampaignStatus, NewCampaign, add_to_campaign_amount,
    create_campaign, create_campaign_table, get_campaign, get_campaign_refs, get_campaign_titles,
    get_campaigns, get_featured_campaigns,
};
pub use create_endpoint::{CreateCampaignState, create_campaign_endpoint};
pub use new_campaign_page::get_new_campaign_page;

//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/campaigns/{campaign_id}', use [format_endpoint].

/// The home page with the hero section and featured campaigns.
pub const ROOT: &str = "/";
/// The page listing all donation campaigns.
pub const CAMPAIGNS_VIEW: &str = "/campaigns";
/// The page for a single campaign with its donation form.
pub const CAMPAIGN_VIEW: &str = "/campaigns/{campaign_id}";
/// The page for donating to a specific campaign.
pub const DONATE_VIEW: &str = "/donate/{campaign_id}";
/// The volunteer application form.
pub const VOLUNTEER_VIEW: &str = "/volunteer";
/// The fund-transparency report page.
pub const TRANSPARENCY_VIEW: &str = "/transparency";
/// The CSV download of the fund report.
pub const TRANSPARENCY_EXPORT: &str = "/transparency/export";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The admin page for recording a ledger entry.
pub const NEW_LEDGER_ENTRY_VIEW: &str = "/admin/ledger/new";
/// The admin page for creating a campaign.
pub const NEW_CAMPAIGN_VIEW: &str = "/admin/campaigns/new";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to register users.
pub const USERS_API: &str = "/api/users";
/// The route to submit donations.
pub const DONATIONS_API: &str = "/api/donations";
/// The route to submit volunteer applications.
pub const VOLUNTEERS_API: &str = "/api/volunteers";
/// The route to record ledger entries (admin).
pub const LEDGER_API: &str = "/api/ledger";
/// The route to create campaigns (admin).
pub const CAMPAIGNS_API: &str = "/api/campaigns";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/campaigns/{campaign_id}',
/// '{campaign_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

//! Helpers for resolving the server's configured timezone.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the current UTC offset for a canonical timezone name,
/// e.g. "Asia/Jakarta".
///
/// Returns `None` if the name is not a known canonical timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Get today's date in the timezone named by `canonical_timezone`.
pub fn get_local_date(canonical_timezone: &str) -> Option<Date> {
    get_local_offset(canonical_timezone)
        .map(|offset| OffsetDateTime::now_utc().to_offset(offset).date())
}

#[cfg(test)]
mod timezone_tests {
    use super::{get_local_date, get_local_offset};

    #[test]
    fn known_timezone_resolves() {
        assert!(get_local_offset("Asia/Jakarta").is_some());
        assert!(get_local_date("Asia/Jakarta").is_some());
    }

    #[test]
    fn unknown_timezone_returns_none() {
        assert!(get_local_offset("Nowhere/Atlantis").is_none());
        assert!(get_local_date("Nowhere/Atlantis").is_none());
    }
}

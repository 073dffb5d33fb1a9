//! The auth token stored in the private cookie.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::user::UserID;

/// The contents of the auth cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The ID of the logged-in user.
    pub user_id: UserID,
    /// When the token stops being valid.
    #[serde(with = "datetime_format")]
    pub expires_at: OffsetDateTime,
}

impl Token {
    /// Whether the token has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= OffsetDateTime::now_utc()
    }
}

/// Serializes and deserializes [OffsetDateTime] with an explicit format
/// description.
///
/// The default human-readable format drops the leading zero on single digit
/// hours, which the parser then rejects, so tokens written shortly after
/// midnight could not be read back.
mod datetime_format {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use time::{
        OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
    };

    const FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory]:[offset_minute]"
    );

    pub fn serialize<S>(datetime: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = datetime
            .format(FORMAT)
            .map_err(|error| serde::ser::Error::custom(error.to_string()))?;

        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;

        OffsetDateTime::parse(&raw, FORMAT).map_err(|error| Error::custom(error.to_string()))
    }
}

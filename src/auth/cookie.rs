//! Reading and writing the private auth cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Expiration, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{
    auth::{token::Token, user::UserID},
    error::Error,
};

/// The name of the auth cookie.
pub const COOKIE_TOKEN: &str = "token";

/// How long an auth cookie stays valid without activity.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(30);

/// Add an auth cookie for `user_id` to the cookie jar.
///
/// The returned jar must be included in the response for the cookie to be
/// set on the client.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = Token {
        user_id,
        expires_at: OffsetDateTime::now_utc() + duration,
    };

    let token_string = serde_json::to_string(&token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token_string))
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true)
            .path("/")
            .expires(Expiration::Session),
    ))
}

/// Replace the auth cookie with one that has already expired, logging the
/// user out.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true)
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH),
    )
}

/// Retrieve and parse the auth token from the cookie jar.
///
/// # Errors
/// Returns [Error::CookieMissing] if there is no auth cookie, or
/// [Error::InvalidCredentials] if the cookie cannot be parsed or has expired.
pub fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;

    let token: Token =
        serde_json::from_str(cookie.value()).map_err(|_| Error::InvalidCredentials)?;

    if token.is_expired() {
        Err(Error::InvalidCredentials)
    } else {
        Ok(token)
    }
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use time::{Duration, OffsetDateTime};

    use crate::{
        auth::{token::Token, user::UserID},
        error::Error,
    };

    use super::{
        COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, get_token_from_cookies, invalidate_auth_cookie,
        set_auth_cookie,
    };

    fn test_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(Key::generate())
    }

    #[test]
    fn set_then_get_returns_token() {
        let jar = set_auth_cookie(test_jar(), UserID::new(7), DEFAULT_COOKIE_DURATION)
            .expect("could not set auth cookie");

        let token = get_token_from_cookies(&jar).expect("could not get token");

        assert_eq!(token.user_id, UserID::new(7));
        assert!(!token.is_expired());
    }

    #[test]
    fn get_fails_without_cookie() {
        let error = get_token_from_cookies(&test_jar())
            .expect_err("empty jar should not contain a token");

        assert_eq!(error, Error::CookieMissing);
    }

    #[test]
    fn get_fails_with_expired_token() {
        let jar = set_auth_cookie(test_jar(), UserID::new(7), Duration::minutes(-5))
            .expect("could not set auth cookie");

        let error =
            get_token_from_cookies(&jar).expect_err("expired token should be rejected");

        assert_eq!(error, Error::InvalidCredentials);
    }

    #[test]
    fn get_fails_with_garbage_cookie() {
        let jar = test_jar().add(
            axum_extra::extract::cookie::Cookie::new(COOKIE_TOKEN, "not a token"),
        );

        let error =
            get_token_from_cookies(&jar).expect_err("garbage cookie should be rejected");

        assert_eq!(error, Error::InvalidCredentials);
    }

    #[test]
    fn invalidate_expires_the_cookie() {
        let jar = set_auth_cookie(test_jar(), UserID::new(7), DEFAULT_COOKIE_DURATION)
            .expect("could not set auth cookie");

        let jar = invalidate_auth_cookie(jar);
        let cookie = jar.get(COOKIE_TOKEN).expect("cookie should still exist");

        assert_eq!(
            cookie.expires_datetime(),
            Some(OffsetDateTime::UNIX_EPOCH)
        );
    }
}

//! Reading and writing the private auth cookie.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::Token};

/// The name of the cookie holding the serialized [Token].
pub(crate) const COOKIE_TOKEN: &str = "token";

/// How long a session lasts without "remember me", and the minimum remaining
/// lifetime after each authenticated request.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

/// Add an auth cookie to `jar` that expires `duration` from now.
///
/// # Errors
///
/// Returns [Error::CookieError] if the expiry overflows or the token cannot be serialized.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or_else(|| Error::CookieError(format!("cannot add {duration} to the current time")))?;

    set_auth_cookie_expiry(jar, expires_at)
}

/// Replace the auth cookie in `jar` with one that expires at `expires_at`.
fn set_auth_cookie_expiry(
    jar: PrivateCookieJar,
    expires_at: OffsetDateTime,
) -> Result<PrivateCookieJar, Error> {
    let token = serde_json::to_string(&Token { expires_at })
        .map_err(|error| Error::CookieError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token))
            .path("/")
            .expires(expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Get the token from the auth cookie in `jar`.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] if the cookie is missing, could not be
/// decrypted, does not hold a token, or the token has expired.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::InvalidCredentials)?;
    let token: Token =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| Error::InvalidCredentials)?;

    if token.is_valid_at(OffsetDateTime::now_utc()) {
        Ok(token)
    } else {
        Err(Error::InvalidCredentials)
    }
}

/// Set the expiry of the auth cookie in `jar` to the later of its current
/// expiry and now plus `duration`.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;
    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or_else(|| Error::CookieError(format!("cannot add {duration} to the current time")))?;

    set_auth_cookie_expiry(jar, max(token.expires_at, new_expiry))
}

/// Overwrite the auth cookie with an invalid value and a max age of zero,
/// which deletes the cookie on the client side.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

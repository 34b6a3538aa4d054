//! Defines functions for handling user authentication with cookies.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::token::Token, user::UserID};

/// The name of the cookie that holds the serialized [Token].
pub(crate) const COOKIE_TOKEN: &str = "token";

/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::days(7);

/// Add an auth cookie to the cookie jar, indicating that a user is logged in
/// and authenticated.
///
/// The token and the cookie both expire `duration` from now.
///
/// # Errors
///
/// Returns [Error::InvalidToken] if the token cannot be serialized.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc() + duration;
    let token = Token {
        user_id,
        expires_at,
    };
    let token_string =
        serde_json::to_string(&token).map_err(|error| Error::InvalidToken(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token_string))
            .path("/")
            .expires(expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Set the auth cookie to an invalid value and set its max age to zero, which
/// should delete the cookie on the client side.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
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

/// Read the token from the auth cookie.
///
/// Returns `Ok(None)` if the cookie is missing or could not be decrypted,
/// which is what a forged or tampered cookie looks like.
///
/// # Errors
///
/// Returns [Error::InvalidToken] if the cookie decrypts but does not hold a
/// token.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Option<Token>, Error> {
    match jar.get(COOKIE_TOKEN) {
        Some(cookie) => serde_json::from_str(cookie.value_trimmed())
            .map(Some)
            .map_err(|error| Error::InvalidToken(error.to_string())),
        None => Ok(None),
    }
}

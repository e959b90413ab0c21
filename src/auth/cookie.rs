//! Defines functions for carrying the session token in a cookie.

use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::models::{Session, SessionToken};

/// The fixed name of the session cookie.
pub(crate) const SESSION_COOKIE: &str = "session_token";

/// Add the session cookie to the cookie jar, indicating that a user is
/// logged in.
///
/// The cookie expires together with the session. `secure` should be true
/// when the server is deployed behind HTTPS.
///
/// Returns the cookie jar with the cookie added.
pub(crate) fn set_session_cookie(jar: CookieJar, session: &Session, secure: bool) -> CookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, session.token().as_str().to_owned()))
            .expires(session.expires_at())
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(secure)
            .path("/"),
    )
}

/// Set the session cookie to an empty value with a max age of zero, which
/// deletes the cookie on the client side.
pub(crate) fn clear_session_cookie(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, ""))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(secure)
            .path("/"),
    )
}

/// Read the session token from the cookie jar, if the cookie is present.
pub(crate) fn session_token_from_jar(jar: &CookieJar) -> Option<SessionToken> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| SessionToken::new(cookie.value_trimmed()))
}

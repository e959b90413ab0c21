//! Session based authentication: issuing, resolving and revoking the opaque
//! tokens that identify logged-in users.

mod cookie;
mod middleware;

pub use middleware::{AuthState, auth_guard};

pub(crate) use cookie::{
    SESSION_COOKIE, clear_session_cookie, session_token_from_jar, set_session_cookie,
};
pub(crate) use middleware::unauthenticated_response;

use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    models::{Session, SessionToken, User, UserID},
    stores::{SessionStore, UserStore},
};

/// How long a session stays valid after it is created.
pub const SESSION_DURATION: Duration = Duration::days(30);

/// Issue a new session for `user_id`.
///
/// Generates a fresh random token with an absolute expiry of now plus
/// [SESSION_DURATION] and persists it. Token collisions are not retried, the
/// token space is treated as collision free.
///
/// # Errors
///
/// Propagates storage errors from the session store.
pub fn create_session(store: &mut impl SessionStore, user_id: UserID) -> Result<Session, Error> {
    let session = Session::new(
        SessionToken::generate(),
        user_id,
        OffsetDateTime::now_utc() + SESSION_DURATION,
    );

    store.create(&session)?;

    Ok(session)
}

/// Resolve `token` to the user that owns it.
///
/// Returns `None` for an unknown token. A session observed past its expiry
/// is deleted before returning `None` (lazy expiry, there is no background
/// sweep). A session whose owner no longer exists also resolves to `None`.
///
/// # Errors
///
/// Propagates storage errors from either store.
pub fn resolve_session(
    sessions: &mut impl SessionStore,
    users: &impl UserStore,
    token: &SessionToken,
) -> Result<Option<User>, Error> {
    let session = match sessions.get(token) {
        Ok(session) => session,
        Err(Error::NotFound) => return Ok(None),
        Err(error) => return Err(error),
    };

    if session.expires_at() <= OffsetDateTime::now_utc() {
        sessions.delete(token)?;
        return Ok(None);
    }

    match users.get(session.user_id()) {
        Ok(user) => Ok(Some(user)),
        Err(Error::NotFound) => Ok(None),
        Err(error) => Err(error),
    }
}

/// Revoke the session identified by `token`.
///
/// Idempotent: revoking an absent token is a no-op.
///
/// # Errors
///
/// Propagates storage errors from the session store.
pub fn destroy_session(
    store: &mut impl SessionStore,
    token: &SessionToken,
) -> Result<(), Error> {
    store.delete(token)
}

#[cfg(test)]
mod auth_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use email_address::EmailAddress;
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime};

    use crate::{
        db,
        models::{PasswordHash, Session, SessionToken, User, UserID},
        stores::{
            SessionStore, UserStore,
            sqlite::{SQLiteSessionStore, SQLiteUserStore},
        },
    };

    use super::{SESSION_DURATION, create_session, destroy_session, resolve_session};

    fn get_stores() -> (SQLiteSessionStore, SQLiteUserStore, User) {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute_batch("PRAGMA foreign_keys = OFF;")
            .unwrap();
        db::initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));

        let mut users = SQLiteUserStore::new(connection.clone());
        let user = users
            .create(
                "Ana",
                EmailAddress::from_str("ana@example.com").unwrap(),
                PasswordHash::new_unchecked("a:b"),
            )
            .unwrap();

        (SQLiteSessionStore::new(connection), users, user)
    }

    #[test]
    fn created_session_resolves_to_its_owner() {
        let (mut sessions, users, user) = get_stores();

        let session = create_session(&mut sessions, user.id()).unwrap();
        let resolved = resolve_session(&mut sessions, &users, session.token()).unwrap();

        assert_eq!(resolved, Some(user));
    }

    #[test]
    fn created_session_expires_thirty_days_from_now() {
        let (mut sessions, _, user) = get_stores();

        let session = create_session(&mut sessions, user.id()).unwrap();

        let want = OffsetDateTime::now_utc() + SESSION_DURATION;
        assert!((session.expires_at() - want).abs() < Duration::seconds(1));
    }

    #[test]
    fn unknown_token_resolves_to_none() {
        let (mut sessions, users, _) = get_stores();

        let resolved =
            resolve_session(&mut sessions, &users, &SessionToken::generate()).unwrap();

        assert_eq!(resolved, None);
    }

    #[test]
    fn expired_session_resolves_to_none_and_is_deleted() {
        let (mut sessions, users, user) = get_stores();
        let expired = Session::new(
            SessionToken::generate(),
            user.id(),
            OffsetDateTime::now_utc() - Duration::seconds(1),
        );
        sessions.create(&expired).unwrap();

        let resolved = resolve_session(&mut sessions, &users, expired.token()).unwrap();

        assert_eq!(resolved, None);
        assert_eq!(sessions.get(expired.token()), Err(crate::Error::NotFound));
    }

    #[test]
    fn session_for_deleted_user_resolves_to_none() {
        let (mut sessions, users, _) = get_stores();
        let orphaned = Session::new(
            SessionToken::generate(),
            UserID::new(999),
            OffsetDateTime::now_utc() + Duration::days(1),
        );
        sessions.create(&orphaned).unwrap();

        let resolved = resolve_session(&mut sessions, &users, orphaned.token()).unwrap();

        assert_eq!(resolved, None);
    }

    #[test]
    fn destroyed_session_no_longer_resolves() {
        let (mut sessions, users, user) = get_stores();
        let session = create_session(&mut sessions, user.id()).unwrap();

        destroy_session(&mut sessions, session.token()).unwrap();

        let resolved = resolve_session(&mut sessions, &users, session.token()).unwrap();
        assert_eq!(resolved, None);
    }

    #[test]
    fn destroying_twice_is_a_no_op() {
        let (mut sessions, _, user) = get_stores();
        let session = create_session(&mut sessions, user.id()).unwrap();

        destroy_session(&mut sessions, session.token()).unwrap();
        destroy_session(&mut sessions, session.token()).unwrap();
    }
}

//! Defines the session store trait.

use crate::{
    Error,
    models::{Session, SessionToken},
};

/// Handles the persistence of login sessions.
pub trait SessionStore {
    /// Persist a new session.
    fn create(&mut self, session: &Session) -> Result<(), Error>;

    /// Look up a session by its token.
    ///
    /// Returns [Error::NotFound] if no session with the given token exists.
    fn get(&self, token: &SessionToken) -> Result<Session, Error>;

    /// Delete every session matching `token`.
    ///
    /// Idempotent: deleting an absent token is a no-op, not an error.
    fn delete(&mut self, token: &SessionToken) -> Result<(), Error>;
}

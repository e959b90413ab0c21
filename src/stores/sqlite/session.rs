//! Implements a SQLite backed session store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Session, SessionToken, UserID},
    stores::SessionStore,
};

/// Stores login sessions in a SQLite database.
///
/// Sessions reference the [User](crate::models::User) model, so the user
/// table must be set up in the same database.
#[derive(Debug, Clone)]
pub struct SQLiteSessionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteSessionStore {
    /// Create a new session store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl SessionStore for SQLiteSessionStore {
    /// Insert a session into the database.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::SqlError] if an SQL related error occurred, including
    /// the astronomically unlikely token collision.
    fn create(&mut self, session: &Session) -> Result<(), Error> {
        self.connection.lock().unwrap().execute(
            "INSERT INTO session (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
            (
                session.token().as_str(),
                session.user_id().as_i64(),
                session.expires_at(),
            ),
        )?;

        Ok(())
    }

    /// Look up the session with the specified `token`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if there is no session with the given
    /// token, or [Error::SqlError] if there are SQL related errors.
    fn get(&self, token: &SessionToken) -> Result<Session, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT token, user_id, expires_at FROM session WHERE token = :token")?
            .query_row(&[(":token", token.as_str())], Self::map_row)
            .map_err(|e| e.into())
    }

    /// Delete every session with the specified `token`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::SqlError] if there are SQL related errors. An absent
    /// token is not an error.
    fn delete(&mut self, token: &SessionToken) -> Result<(), Error> {
        self.connection
            .lock()
            .unwrap()
            .execute("DELETE FROM session WHERE token = ?1", [token.as_str()])?;

        Ok(())
    }
}

impl CreateTable for SQLiteSessionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS session (
                    token TEXT PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    expires_at TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id)
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteSessionStore {
    type ReturnType = Session;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_token: String = row.get(offset)?;
        let raw_user_id: i64 = row.get(offset + 1)?;
        let expires_at: OffsetDateTime = row.get(offset + 2)?;

        Ok(Session::new(
            SessionToken::new(&raw_token),
            UserID::new(raw_user_id),
            expires_at,
        ))
    }
}

//! Implements a SQLite backed user store.
use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{PasswordHash, User, UserID},
    stores::UserStore,
};

/// Handles the creation and retrieval of [User] objects.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateEmail] if `email` is already registered, or
    /// [Error::SqlError] if an SQL related error occurred.
    fn create(
        &mut self,
        name: &str,
        email: EmailAddress,
        password_hash: PasswordHash,
    ) -> Result<User, Error> {
        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT INTO user (name, email, password) VALUES (?1, ?2, ?3)",
            (name, &email.to_string(), password_hash.to_string()),
        )?;

        let id = UserID::new(connection.last_insert_rowid());

        Ok(User::new(
            id,
            name.to_string(),
            Some(email),
            Some(password_hash),
        ))
    }

    /// Get the user with the specified `id`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if there is no user with the specified ID,
    /// or [Error::SqlError] if there are SQL related errors.
    fn get(&self, id: UserID) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, name, email, password FROM user WHERE id = :id")?
            .query_row(&[(":id", &id.as_i64())], Self::map_row)
            .map_err(|e| e.into())
    }

    /// Get the user with the specified `email` address.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if there is no user with the specified
    /// email, or [Error::SqlError] if there are SQL related errors.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, name, email, password FROM user WHERE email = :email")?
            .query_row(&[(":email", &email.to_string())], Self::map_row)
            .map_err(|e| e.into())
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        // Email and password are nullable for accounts that predate
        // authentication. SQLite's UNIQUE treats NULLs as distinct.
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT UNIQUE,
                    password TEXT
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_id = row.get(offset)?;
        let name: String = row.get(offset + 1)?;
        let raw_email: Option<String> = row.get(offset + 2)?;
        let raw_password_hash: Option<String> = row.get(offset + 3)?;

        let id = UserID::new(raw_id);
        let email = raw_email.map(EmailAddress::new_unchecked);
        let password_hash = raw_password_hash
            .as_deref()
            .map(PasswordHash::new_unchecked);

        Ok(User::new(id, name, email, password_hash))
    }
}

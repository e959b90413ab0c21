//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, types::Type};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{NewTransaction, Transaction, UserID},
    stores::TransactionStore,
};

/// Stores transactions in a SQLite database.
///
/// Owned transactions reference the [User](crate::models::User) model, so
/// the user table must be set up in the same database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn select(&self, where_clause: &str, params: &[(&str, &dyn rusqlite::ToSql)]) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT id, kind, amount, description, currency, user_id, created_at \
                 FROM \"transaction\" {where_clause} ORDER BY created_at DESC, id DESC"
            ))?
            .query_map(params, Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Insert a validated transaction, stamping the row ID and the creation
    /// time.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::SqlError] if there is an SQL related error.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        let created_at = OffsetDateTime::now_utc();

        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO \"transaction\" (kind, amount, description, currency, user_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, kind, amount, description, currency, user_id, created_at",
            )?
            .query_row(
                (
                    new_transaction.kind.to_string(),
                    new_transaction.amount,
                    new_transaction.description,
                    new_transaction.currency.code(),
                    new_transaction.user_id.map(|id| id.as_i64()),
                    created_at,
                ),
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Retrieve the transactions owned by `user_id`, newest first.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::SqlError] if there is an SQL related error.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        self.select(
            "WHERE user_id = :user_id",
            &[(":user_id", &user_id.as_i64())],
        )
    }

    /// Retrieve every transaction regardless of owner, newest first.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::SqlError] if there is an SQL related error.
    fn all(&self) -> Result<Vec<Transaction>, Error> {
        self.select("", &[])
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        // user_id is nullable: rows created before accounts were introduced
        // have no owner.
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY,
                    kind TEXT NOT NULL,
                    amount REAL NOT NULL,
                    description TEXT NOT NULL,
                    currency TEXT NOT NULL,
                    user_id INTEGER,
                    created_at TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id)
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_kind: String = row.get(offset + 1)?;
        let kind = raw_kind.parse().map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 1, Type::Text, Box::new(error))
        })?;

        let raw_currency: String = row.get(offset + 4)?;
        let currency = raw_currency.parse().map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 4, Type::Text, Box::new(error))
        })?;

        let raw_user_id: Option<i64> = row.get(offset + 5)?;

        Ok(Transaction::new(
            row.get(offset)?,
            kind,
            row.get(offset + 2)?,
            row.get(offset + 3)?,
            currency,
            raw_user_id.map(UserID::new),
            row.get(offset + 6)?,
        ))
    }
}

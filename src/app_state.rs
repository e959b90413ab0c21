//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    balance::EssentialKeywords,
    conversion::RateTable,
    db::initialize,
    stores::sqlite::{SQLiteSessionStore, SQLiteTransactionStore, SQLiteUserStore},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The user store.
    pub user_store: SQLiteUserStore,

    /// The session store.
    pub session_store: SQLiteSessionStore,

    /// The transaction store.
    pub transaction_store: SQLiteTransactionStore,

    /// The exchange rates used to project balances into a display currency.
    pub rate_table: RateTable,

    /// The keyword list that classifies an expense as essential.
    pub essential_keywords: EssentialKeywords,

    /// Whether session cookies carry the `Secure` attribute. Should be true
    /// when the server is deployed behind HTTPS.
    pub secure_cookies: bool,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models. The default rate table and keyword list are used;
    /// override the fields to inject different configuration.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, secure_cookies: bool) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            user_store: SQLiteUserStore::new(connection.clone()),
            session_store: SQLiteSessionStore::new(connection.clone()),
            transaction_store: SQLiteTransactionStore::new(connection),
            rate_table: RateTable::default(),
            essential_keywords: EssentialKeywords::default(),
            secure_cookies,
        })
    }
}

#![allow(missing_docs)]
//! Helpers shared by the endpoint tests.

use std::str::FromStr;

use axum_test::TestServer;
use email_address::EmailAddress;
use rusqlite::Connection;

use crate::{
    AppState, build_router,
    models::{PasswordHash, User},
    stores::UserStore,
};

/// An [AppState] backed by a fresh in-memory database.
pub(crate) fn test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database.");

    AppState::new(connection, false).expect("Could not create app state.")
}

/// A [TestServer] running the full application router, plus the state behind
/// it for direct store access.
pub(crate) fn test_server() -> (TestServer, AppState) {
    let state = test_state();
    let server = TestServer::new(build_router(state.clone()));

    (server, state)
}

/// Insert a user directly into the store, bypassing the register endpoint.
///
/// The stored password hash is a placeholder that verifies nothing.
pub(crate) fn create_test_user(state: &AppState, name: &str, email: &str) -> User {
    state
        .user_store
        .clone()
        .create(
            name,
            EmailAddress::from_str(email).expect("Invalid test email."),
            PasswordHash::new_unchecked("0badc0de:0badc0de"),
        )
        .expect("Could not create test user.")
}

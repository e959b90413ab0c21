//! This file defines a user of the application and its supporting types.

use std::fmt::Display;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::models::PasswordHash;

/// A newtype wrapper for integer user IDs.
/// This helps disambiguate user IDs from other types of IDs, leading to
/// better compile time errors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Wrap a raw database ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The underlying integer ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
///
/// Email and password hash are optional because accounts created before
/// authentication was introduced only carry a display name. Such accounts
/// cannot log in.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserID,
    name: String,
    email: Option<EmailAddress>,
    password_hash: Option<PasswordHash>,
}

impl User {
    /// Assemble a user from its stored parts.
    pub fn new(
        id: UserID,
        name: String,
        email: Option<EmailAddress>,
        password_hash: Option<PasswordHash>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
        }
    }

    /// The user's ID in the database.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The user's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The email address associated with the user, if any.
    pub fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// The user's password hash, absent for legacy name-only accounts.
    pub fn password_hash(&self) -> Option<&PasswordHash> {
        self.password_hash.as_ref()
    }
}

#[cfg(test)]
mod user_tests {
    use std::str::FromStr;

    use email_address::EmailAddress;

    use crate::models::{PasswordHash, User, UserID};

    #[test]
    fn accessors_return_constructor_values() {
        let email = EmailAddress::from_str("ana@example.com").unwrap();
        let hash = PasswordHash::new_unchecked("deadbeef:feedc0de");
        let user = User::new(
            UserID::new(7),
            "Ana".to_owned(),
            Some(email.clone()),
            Some(hash.clone()),
        );

        assert_eq!(user.id(), UserID::new(7));
        assert_eq!(user.name(), "Ana");
        assert_eq!(user.email(), Some(&email));
        assert_eq!(user.password_hash(), Some(&hash));
    }

    #[test]
    fn legacy_account_has_no_credentials() {
        let user = User::new(UserID::new(1), "Convidado".to_owned(), None, None);

        assert!(user.email().is_none());
        assert!(user.password_hash().is_none());
    }
}

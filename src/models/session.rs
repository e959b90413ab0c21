//! Defines the opaque session token and the session record it identifies.

use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::UserID;

/// Number of random bytes in a generated token.
const TOKEN_LENGTH: usize = 32;

/// An unguessable random string used as a session identifier.
///
/// The token carries no embedded claims, it is only a key into the session
/// store. The token space is large enough that collisions are not handled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh token from 32 cryptographically random bytes.
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_LENGTH];
        OsRng.fill_bytes(&mut bytes);

        Self(hex::encode(bytes))
    }

    /// Wrap a raw token value, e.g. one read from a request cookie.
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    /// The token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A logged-in user's session.
///
/// Valid while `now < expires_at`. Expiry is lazy: an expired session is
/// deleted when it is next resolved, not by a background sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    token: SessionToken,
    user_id: UserID,
    expires_at: OffsetDateTime,
}

impl Session {
    /// Assemble a session from its parts.
    pub fn new(token: SessionToken, user_id: UserID, expires_at: OffsetDateTime) -> Self {
        Self {
            token,
            user_id,
            expires_at,
        }
    }

    /// The opaque token identifying this session.
    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// The ID of the user that owns this session.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    /// The absolute expiry timestamp.
    pub fn expires_at(&self) -> OffsetDateTime {
        self.expires_at
    }
}

#[cfg(test)]
mod session_token_tests {
    use super::SessionToken;

    #[test]
    fn generated_token_is_64_hex_characters() {
        let token = SessionToken::generate();

        assert_eq!(token.as_str().len(), 64);
        assert!(hex::decode(token.as_str()).is_ok());
    }

    #[test]
    fn generated_tokens_are_distinct() {
        assert_ne!(SessionToken::generate(), SessionToken::generate());
    }

    #[test]
    fn wrapped_token_round_trips() {
        let token = SessionToken::new("abc123");

        assert_eq!(token.as_str(), "abc123");
    }
}

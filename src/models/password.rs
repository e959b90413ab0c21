//! This file defines the type that handles password hashing and
//! verification. Passwords are salted and stretched with scrypt and stored as
//! `saltHex:derivedHex`.

use std::fmt::Display;

use rand::{RngCore, rngs::OsRng};
use scrypt::{Params, scrypt};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::Error;

/// A salted and hashed password in the form `saltHex:derivedHex`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

/// Number of random bytes in a freshly generated salt.
const SALT_LENGTH: usize = 16;

/// Length of the derived key in bytes.
const KEY_LENGTH: usize = 64;

/// log2 of the scrypt work factor N.
const LOG_N: u8 = 14;

impl PasswordHash {
    /// Salt and hash `password`, consuming randomness for the salt.
    ///
    /// # Errors
    ///
    /// Returns an [Error::HashingError] if the key derivation fails. The
    /// error string should only be logged on the server, never shown to the
    /// client.
    pub fn new(password: &str) -> Result<Self, Error> {
        let mut salt_bytes = [0u8; SALT_LENGTH];
        OsRng.fill_bytes(&mut salt_bytes);
        let salt = hex::encode(salt_bytes);

        let derived = derive_key(password, &salt)?;

        Ok(Self(format!("{salt}:{}", hex::encode(derived))))
    }

    /// Create a `PasswordHash` from a stored string without any validation.
    ///
    /// The caller should ensure that `raw_password_hash` came from
    /// [PasswordHash::new]. An invalid value will not cause an error here, it
    /// will simply fail every verification.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Check that `password` matches the stored hash.
    ///
    /// Fails closed: a malformed stored value (missing separator, empty
    /// salt, non-hex or wrong-length digest) returns `false` rather than an
    /// error. The digest comparison runs in constant time.
    pub fn verify(&self, password: &str) -> bool {
        let Some((salt, stored_hex)) = self.0.split_once(':') else {
            return false;
        };

        if salt.is_empty() {
            return false;
        }

        let Ok(stored) = hex::decode(stored_hex) else {
            return false;
        };

        if stored.len() != KEY_LENGTH {
            return false;
        }

        let Ok(derived) = derive_key(password, salt) else {
            return false;
        };

        derived.as_slice().ct_eq(&stored).into()
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stretch `password` with the stored `salt` string.
///
/// The salt is fed to the KDF as its text bytes, matching the stored
/// `saltHex:derivedHex` layout where the salt half is the hex string itself.
fn derive_key(password: &str, salt: &str) -> Result<[u8; KEY_LENGTH], Error> {
    let params =
        Params::new(LOG_N, 8, 1, KEY_LENGTH).map_err(|e| Error::HashingError(e.to_string()))?;

    let mut derived = [0u8; KEY_LENGTH];
    scrypt(password.as_bytes(), salt.as_bytes(), &params, &mut derived)
        .map_err(|e| Error::HashingError(e.to_string()))?;

    Ok(derived)
}

#[cfg(test)]
mod password_hash_tests {
    use super::PasswordHash;

    #[test]
    fn verify_succeeds_for_correct_password() {
        let hash = PasswordHash::new("correct horse battery staple").unwrap();

        assert!(hash.verify("correct horse battery staple"));
    }

    #[test]
    fn verify_fails_for_wrong_password() {
        let hash = PasswordHash::new("correct horse battery staple").unwrap();

        assert!(!hash.verify("incorrect horse battery staple"));
        assert!(!hash.verify(""));
    }

    #[test]
    fn hashing_same_password_twice_produces_distinct_salts() {
        let first = PasswordHash::new("hunter2").unwrap();
        let second = PasswordHash::new("hunter2").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn stored_form_has_salt_and_digest_halves() {
        let hash = PasswordHash::new("hunter2").unwrap().to_string();
        let (salt, digest) = hash.split_once(':').unwrap();

        assert_eq!(salt.len(), 32);
        assert_eq!(digest.len(), 128);
        assert!(hex::decode(salt).is_ok());
        assert!(hex::decode(digest).is_ok());
    }

    #[test]
    fn verify_fails_closed_on_missing_separator() {
        let hash = PasswordHash::new_unchecked("deadbeefdeadbeef");

        assert!(!hash.verify("hunter2"));
    }

    #[test]
    fn verify_fails_closed_on_empty_halves() {
        assert!(!PasswordHash::new_unchecked(":").verify("hunter2"));
        assert!(!PasswordHash::new_unchecked("deadbeef:").verify("hunter2"));
        assert!(!PasswordHash::new_unchecked(":deadbeef").verify("hunter2"));
    }

    #[test]
    fn verify_fails_closed_on_non_hex_digest() {
        let hash = PasswordHash::new_unchecked("deadbeef:not-hex-at-all");

        assert!(!hash.verify("hunter2"));
    }

    #[test]
    fn verify_fails_closed_on_truncated_digest() {
        let valid = PasswordHash::new("hunter2").unwrap().to_string();
        let truncated = PasswordHash::new_unchecked(&valid[..valid.len() - 2]);

        assert!(!truncated.verify("hunter2"));
    }
}

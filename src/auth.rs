//! Credential store and session authentication.
//!
//! Both the HTTP `/send` endpoint and the admin console authenticate against
//! the same store, loaded once at startup from `[[users]]` config entries.
//! Lookups are exact-match and case-sensitive. Password comparison is
//! constant-time so response timing does not reveal whether the username or
//! the password was the mismatched field.

use std::collections::HashMap;

use crate::config::UserConfig;

/// Compared against when the username is unknown, to keep timing flat.
const DUMMY_PASSWORD: &[u8] = b"\xff\xff\xff\xff\xff\xff\xff\xff";

/// Immutable username → password map built at startup.
#[derive(Debug)]
pub struct CredentialStore {
    users: HashMap<String, String>,
}

impl CredentialStore {
    /// Build the store from config entries.
    ///
    /// Usernames must be unique within the store; duplicates are a
    /// configuration error.
    pub fn from_config(users: &[UserConfig]) -> Result<Self, String> {
        let mut map = HashMap::with_capacity(users.len());
        for user in users {
            if map
                .insert(user.username.clone(), user.password.clone())
                .is_some()
            {
                return Err(format!("Duplicate username in config: {}", user.username));
            }
        }
        Ok(Self { users: map })
    }

    /// Validate a username/password pair. Never errors — unknown usernames
    /// simply return `false`.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        match self.users.get(username) {
            Some(expected) => constant_time_eq(expected.as_bytes(), password.as_bytes()),
            None => {
                // Burn a comparison anyway so unknown usernames cost the
                // same as wrong passwords.
                constant_time_eq(DUMMY_PASSWORD, password.as_bytes());
                false
            }
        }
    }

    /// Number of configured users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Constant-time byte comparison to prevent timing side-channel attacks.
///
/// Always iterates over the full length of `expected` regardless of `provided`
/// length, so an attacker cannot determine the password length from response
/// times.
pub fn constant_time_eq(expected: &[u8], provided: &[u8]) -> bool {
    let mut diff = u8::from(expected.len() != provided.len());
    for i in 0..expected.len() {
        let p = if i < provided.len() {
            provided[i]
        } else {
            0xff
        };
        diff |= expected[i] ^ p;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CredentialStore {
        CredentialStore::from_config(&[
            UserConfig {
                username: "admin".to_string(),
                password: "admin123".to_string(),
            },
            UserConfig {
                username: "ops".to_string(),
                password: "s3cret".to_string(),
            },
        ])
        .expect("store should build")
    }

    #[test]
    fn test_authenticate_valid() {
        assert!(store().authenticate("admin", "admin123"));
    }

    #[test]
    fn test_authenticate_wrong_password() {
        assert!(!store().authenticate("admin", "wrong"));
    }

    #[test]
    fn test_authenticate_unknown_user() {
        assert!(!store().authenticate("nobody", "admin123"));
    }

    #[test]
    fn test_authenticate_case_sensitive() {
        assert!(!store().authenticate("Admin", "admin123"));
        assert!(!store().authenticate("admin", "ADMIN123"));
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let result = CredentialStore::from_config(&[
            UserConfig {
                username: "admin".to_string(),
                password: "a".to_string(),
            },
            UserConfig {
                username: "admin".to_string(),
                password: "b".to_string(),
            },
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_constant_time_eq_equal() {
        assert!(constant_time_eq(b"admin123", b"admin123"));
    }

    #[test]
    fn test_constant_time_eq_differs() {
        assert!(!constant_time_eq(b"admin123", b"admin124"));
    }

    #[test]
    fn test_constant_time_eq_length_mismatch() {
        assert!(!constant_time_eq(b"admin123", b"admin"));
        assert!(!constant_time_eq(b"admin", b"admin123"));
    }

    #[test]
    fn test_constant_time_eq_empty() {
        assert!(constant_time_eq(b"", b""));
        assert!(!constant_time_eq(b"x", b""));
    }
}

//! Port abstraction for salted password hashing used by the seeder.

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashers.
    pub enum PasswordHashError {
        /// Hashing failed.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Port for producing salted password hashes.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `plaintext`.
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError>;
}

/// Deterministic hasher for tests; prefixes the plaintext with a marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePasswordHasher;

impl FixturePasswordHasher {
    /// Marker prepended to every hashed value.
    pub const PREFIX: &'static str = "hashed:";
}

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        Ok(format!("{}{plaintext}", Self::PREFIX))
    }
}

//! bcrypt implementation of the [`PasswordHasher`] port.

use tracing::debug;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Salted bcrypt hasher.
///
/// # Examples
///
/// ```
/// use fleetify::domain::ports::PasswordHasher;
/// use fleetify::outbound::security::BcryptPasswordHasher;
///
/// let hasher = BcryptPasswordHasher::with_cost(4);
/// let hash = hasher.hash("password123").expect("hashing succeeds");
/// assert!(hash.starts_with("$2b$04$"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Hasher using `cost` rounds (bcrypt accepts 4 to 31).
    pub const fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Configured cost.
    pub const fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        bcrypt::hash(plaintext, self.cost).map_err(|error| {
            debug!(cost = self.cost, %error, "bcrypt hashing failed");
            PasswordHashError::hash(error.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn hashes_verify_against_the_plaintext() {
        let hasher = BcryptPasswordHasher::with_cost(4);
        let hash = hasher.hash("password123").expect("hashing succeeds");

        assert_ne!(hash, "password123");
        assert!(bcrypt::verify("password123", &hash).expect("hash parses"));
    }

    #[rstest]
    fn hashes_are_salted() {
        let hasher = BcryptPasswordHasher::with_cost(4);
        let first = hasher.hash("secret").expect("hashing succeeds");
        let second = hasher.hash("secret").expect("hashing succeeds");
        assert_ne!(first, second);
    }

    #[rstest]
    #[case(3)]
    #[case(32)]
    fn out_of_range_costs_fail(#[case] cost: u32) {
        let result = BcryptPasswordHasher::with_cost(cost).hash("secret");
        assert!(matches!(result, Err(PasswordHashError::Hash { .. })));
    }

    #[rstest]
    fn default_uses_the_library_cost() {
        assert_eq!(BcryptPasswordHasher::default().cost(), bcrypt::DEFAULT_COST);
    }
}

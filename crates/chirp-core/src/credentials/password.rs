//! Salted adaptive password hashing (bcrypt).

use crate::error::{Error, Result};
use bcrypt::{hash, verify, DEFAULT_COST};

/// One-way password hasher. Every hash carries its own random salt.
#[derive(Clone, Copy, Debug)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    /// Hasher with an explicit bcrypt cost. Production code uses `default()`.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String> {
        hash(password, self.cost).map_err(|e| Error::HashingFailure(e.to_string()))
    }

    /// Returns `false` on mismatch. A stored value that is not a bcrypt hash
    /// also reads as a mismatch rather than an error.
    pub fn verify(&self, password: &str, password_hash: &str) -> bool {
        verify(password, password_hash).unwrap_or(false)
    }
}

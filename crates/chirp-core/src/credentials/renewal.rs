//! Opaque renewal tokens, stored against the account in the record store.

use crate::error::Result;
use crate::store::JsonStore;
use rand::RngCore;
use std::sync::Arc;

/// Token byte length before hex encoding (32 bytes = 64 hex chars).
const RENEWAL_TOKEN_BYTES: usize = 32;

/// Generate a random renewal token (hex-encoded).
pub fn generate_renewal_token() -> String {
    let mut bytes = [0u8; RENEWAL_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Whether a revoke call actually cleared a stored token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeOutcome {
    Revoked,
    Unknown,
}

/// One active renewal token per account; issuing replaces the previous one.
#[derive(Clone)]
pub struct RenewalRegistry {
    store: Arc<JsonStore>,
}

impl RenewalRegistry {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    pub fn issue(&self, account_id: u64) -> Result<String> {
        let token = generate_renewal_token();
        self.store.issue_renewal_token(account_id, &token)?;
        Ok(token)
    }

    pub fn lookup(&self, token: &str) -> Result<u64> {
        self.store.lookup_account_by_renewal_token(token)
    }

    pub fn revoke(&self, token: &str) -> Result<RevokeOutcome> {
        Ok(if self.store.revoke_renewal_token(token)? {
            RevokeOutcome::Revoked
        } else {
            RevokeOutcome::Unknown
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::PasswordHasher;
    use tempfile::TempDir;

    #[test]
    fn test_generated_tokens_are_long_hex_and_unique() {
        let a = generate_renewal_token();
        let b = generate_renewal_token();
        assert_eq!(a.len(), RENEWAL_TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_issue_lookup_revoke() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(
            JsonStore::open_with_hasher(
                dir.path().join("database.json"),
                PasswordHasher::with_cost(4 /* bcrypt minimum cost */),
            )
            .unwrap(),
        );
        let account = store.create_account("a@example.com", "pw").unwrap();
        let registry = RenewalRegistry::new(store);

        let first = registry.issue(account.id).unwrap();
        let second = registry.issue(account.id).unwrap();
        assert!(registry.lookup(&first).unwrap_err().is_not_found());
        assert_eq!(registry.lookup(&second).unwrap(), account.id);

        assert_eq!(registry.revoke(&second).unwrap(), RevokeOutcome::Revoked);
        assert_eq!(registry.revoke(&second).unwrap(), RevokeOutcome::Unknown);
        assert!(registry.lookup(&second).unwrap_err().is_not_found());
    }
}

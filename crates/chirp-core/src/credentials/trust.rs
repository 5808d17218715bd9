//! Trusted-caller key check for the upgrade webhook.

use crate::error::{Error, Result};

/// The only webhook event that changes state.
pub const UPGRADE_EVENT: &str = "user.upgraded";

#[derive(Clone, Debug)]
pub struct TrustKeyVerifier {
    key: String,
}

impl TrustKeyVerifier {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Plain equality against the configured key. An unconfigured (empty)
    /// key never verifies.
    pub fn verify(&self, presented: &str) -> Result<()> {
        if self.key.is_empty() || presented != self.key {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }
}

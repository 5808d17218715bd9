//! Core configuration
//!
//! Secrets are read once by the process and handed to the credential
//! components explicitly. Nothing in the core reads the environment on its own.

use crate::error::{Error, Result};

/// Ceiling for short-lived token lifetimes, in seconds.
pub const MAX_TOKEN_TTL_SECS: u64 = 60 * 60;

/// What `delete_post` does when the id does not exist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Deleting a missing post succeeds without changing anything.
    #[default]
    Idempotent,
    /// Deleting a missing post fails with `NotFound`.
    Strict,
}

/// Configuration for the credential lifecycle and record services
#[derive(Clone, Debug)]
pub struct CoreConfig {
    /// Symmetric secret used to sign short-lived tokens
    pub signing_secret: String,
    /// Key presented by the trusted upgrade caller
    pub trust_key: String,
    /// Upper bound on short-lived token lifetimes
    pub token_ttl_ceiling_secs: u64,
    pub delete_policy: DeletePolicy,
}

impl CoreConfig {
    pub fn new(signing_secret: impl Into<String>, trust_key: impl Into<String>) -> Self {
        Self {
            signing_secret: signing_secret.into(),
            trust_key: trust_key.into(),
            token_ttl_ceiling_secs: MAX_TOKEN_TTL_SECS,
            delete_policy: DeletePolicy::default(),
        }
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    /// Build from `JWT_SECRET` and `POLKA_KEY`.
    ///
    /// A missing signing secret is an error; a missing trust key leaves the
    /// upgrade pathway closed (an empty key never verifies).
    pub fn from_env() -> Result<Self> {
        let signing_secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Config("JWT_SECRET is not set".to_string()))?;
        let trust_key = std::env::var("POLKA_KEY").unwrap_or_default();
        let strict = std::env::var("CHIRP_STRICT_DELETE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let policy = if strict {
            DeletePolicy::Strict
        } else {
            DeletePolicy::Idempotent
        };
        Ok(Self::new(signing_secret, trust_key).with_delete_policy(policy))
    }
}

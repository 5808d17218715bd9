//! Session and account service
//!
//! Login, token refresh and revocation, account updates, and the trusted
//! upgrade pathway. Login failures are indistinguishable: an
//! unknown email and a wrong password both come back as `Unauthorized`.

use crate::config::CoreConfig;
use crate::credentials::{
    RenewalRegistry, RevokeOutcome, TokenAuthority, TrustKeyVerifier, UPGRADE_EVENT,
};
use crate::error::{Error, Result};
use crate::service::{authenticate, Caller};
use crate::store::{AccountSummary, JsonStore};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything a client receives from a successful login
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub account: AccountSummary,
    /// Short-lived signed token
    pub token: String,
    /// Opaque renewal credential
    pub renewal_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeOutcome {
    Upgraded,
    /// Event type this service does not act on
    Ignored,
}

#[derive(Clone)]
pub struct SessionService {
    store: Arc<JsonStore>,
    tokens: TokenAuthority,
    renewals: RenewalRegistry,
    trust: TrustKeyVerifier,
}

impl SessionService {
    pub fn new(store: Arc<JsonStore>, config: &CoreConfig) -> Self {
        Self {
            tokens: TokenAuthority::from_config(config),
            renewals: RenewalRegistry::new(store.clone()),
            trust: TrustKeyVerifier::new(config.trust_key.clone()),
            store,
        }
    }

    pub fn tokens(&self) -> &TokenAuthority {
        &self.tokens
    }

    pub fn register(&self, email: &str, password: &str) -> Result<AccountSummary> {
        let account = self.store.create_account(email, password)?;
        Ok(account.into())
    }

    /// Verify credentials, mint a short-lived token and issue a fresh renewal
    /// token (replacing any earlier one for this account).
    pub fn login(
        &self,
        email: &str,
        password: &str,
        requested_ttl_secs: Option<u64>,
    ) -> Result<LoginSession> {
        let account = match self.store.get_account_by_email(email) {
            Ok(account) => account,
            Err(Error::NotFound) => {
                warn!("Failed login attempt");
                return Err(Error::Unauthorized);
            }
            Err(e) => return Err(e),
        };

        if !self.store.hasher().verify(password, &account.password_hash) {
            warn!("Failed login attempt for account {}", account.id);
            return Err(Error::Unauthorized);
        }

        let token = self.tokens.mint(account.id, requested_ttl_secs)?;
        let renewal_token = self.renewals.issue(account.id)?;

        info!("Account {} logged in", account.id);

        Ok(LoginSession {
            account: account.into(),
            token,
            renewal_token,
        })
    }

    /// Resolve a short-lived token to its caller.
    pub fn authenticate(&self, token: &str) -> Result<Caller> {
        authenticate(&self.tokens, token)
    }

    /// Mint a new short-lived token at the full ceiling lifetime. The renewal
    /// token itself is not rotated.
    pub fn refresh(&self, renewal_token: &str) -> Result<String> {
        let account_id = self.renewals.lookup(renewal_token)?;
        self.tokens.mint(account_id, None)
    }

    pub fn revoke(&self, renewal_token: &str) -> Result<RevokeOutcome> {
        let outcome = self.renewals.revoke(renewal_token)?;
        debug!("Revoke outcome: {:?}", outcome);
        Ok(outcome)
    }

    /// Replace the caller's email and password. Renewal token and privileged
    /// flag are untouched.
    pub fn update_account(
        &self,
        caller: &Caller,
        email: &str,
        password: &str,
    ) -> Result<AccountSummary> {
        let password_hash = self.store.hasher().hash(password)?;
        let account = self
            .store
            .update_account(caller.account_id(), email, &password_hash)?;
        Ok(account.into())
    }

    /// Trusted upgrade pathway. The key is checked first; unknown event names
    /// succeed without touching the store.
    pub fn upgrade(
        &self,
        presented_key: &str,
        event: &str,
        account_id: u64,
    ) -> Result<UpgradeOutcome> {
        self.trust.verify(presented_key)?;

        if event != UPGRADE_EVENT {
            debug!("Ignoring webhook event {:?}", event);
            return Ok(UpgradeOutcome::Ignored);
        }

        self.store.set_privileged(account_id)?;
        Ok(UpgradeOutcome::Upgraded)
    }
}

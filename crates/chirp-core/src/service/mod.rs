//! Orchestration services
//!
//! `SessionService` covers the account and credential lifecycle;
//! `RecordService` covers posts. Both collapse internal failure reasons into
//! the single outcome each operation promises.

pub mod censor;
pub mod records;
pub mod session;

pub use records::{PostQuery, RecordService, SortOrder};
pub use session::{LoginSession, SessionService, UpgradeOutcome};

use crate::credentials::TokenAuthority;
use crate::error::Result;

/// An account that presented a valid short-lived token.
///
/// Only produced by token validation, so holding one is proof of identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    account_id: u64,
}

impl Caller {
    pub fn account_id(&self) -> u64 {
        self.account_id
    }
}

pub(crate) fn authenticate(tokens: &TokenAuthority, token: &str) -> Result<Caller> {
    let account_id = tokens.validate(token)?;
    Ok(Caller { account_id })
}

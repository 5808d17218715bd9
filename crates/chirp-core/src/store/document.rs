//! The persisted document: every account and every post in one structure.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Account record stored in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub email: String,
    pub password_hash: String,
    /// Present only while a renewal credential is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewal_token: Option<String>,
    #[serde(default)]
    pub privileged: bool,
}

/// Public account info (no credentials)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: u64,
    pub email: String,
    pub privileged: bool,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            privileged: account.privileged,
        }
    }
}

impl From<Account> for AccountSummary {
    fn from(account: Account) -> Self {
        Self::from(&account)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub body: String,
    pub author_id: u64,
}

/// Whole-document unit of durability.
///
/// `account_seq` / `post_seq` hold the highest id ever issued in each
/// collection. Documents written before the counters existed load them as 0
/// and fall back to the highest key present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub accounts: BTreeMap<u64, Account>,
    #[serde(default)]
    pub posts: BTreeMap<u64, Post>,
    #[serde(default)]
    account_seq: u64,
    #[serde(default)]
    post_seq: u64,
}

fn highest_key<V>(map: &BTreeMap<u64, V>) -> u64 {
    map.last_key_value().map(|(id, _)| *id).unwrap_or(0)
}

impl Document {
    /// Highest account id issued so far.
    pub fn account_ceiling(&self) -> u64 {
        self.account_seq.max(highest_key(&self.accounts))
    }

    /// Highest post id issued so far. Ids above this were never assigned.
    pub fn post_ceiling(&self) -> u64 {
        self.post_seq.max(highest_key(&self.posts))
    }

    /// Reserve the next account id (count + 1 while nothing has been deleted).
    pub fn next_account_id(&mut self) -> u64 {
        self.account_seq = self.account_ceiling() + 1;
        self.account_seq
    }

    /// Reserve the next post id. Ids freed by deletion are never handed out again.
    pub fn next_post_id(&mut self) -> u64 {
        self.post_seq = self.post_ceiling() + 1;
        self.post_seq
    }

    pub fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts.values().find(|a| a.email == email)
    }

    pub fn account_by_renewal_token_mut(&mut self, token: &str) -> Option<&mut Account> {
        self.accounts
            .values_mut()
            .find(|a| a.renewal_token.as_deref() == Some(token))
    }
}

//! Chirp core
//!
//! Authenticated record store: the credential lifecycle (password hashing,
//! short-lived signed tokens, opaque renewal tokens, trusted-caller keys) and
//! a single-document JSON store for accounts and posts.
//!
//! Every operation is synchronous and returns a classified [`Error`]; turning
//! requests into calls and results into responses is the caller's job.

pub mod config;
pub mod credentials;
pub mod error;
pub mod service;
pub mod store;

pub use config::{CoreConfig, DeletePolicy, MAX_TOKEN_TTL_SECS};
pub use credentials::{extract_api_key, extract_bearer, RevokeOutcome};
pub use error::{Error, Result};
pub use service::{
    Caller, LoginSession, PostQuery, RecordService, SessionService, SortOrder, UpgradeOutcome,
};
pub use store::{Account, AccountSummary, JsonStore, Post};

use std::sync::Arc;

/// The store plus both services, sharing one store handle.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<JsonStore>,
    pub sessions: SessionService,
    pub records: RecordService,
}

impl Services {
    pub fn new(store: Arc<JsonStore>, config: &CoreConfig) -> Self {
        Self {
            sessions: SessionService::new(store.clone(), config),
            records: RecordService::new(store.clone(), config),
            store,
        }
    }
}

use crate::error::{Error, Result};
use axum::{extract::FromRequestParts, http::request::Parts};
use chirp_core::Caller;

/// Authenticated caller, placed in request extensions by `mw_require_auth`.
#[derive(Clone, Copy, Debug)]
pub struct Ctx {
    caller: Caller,
}

impl Ctx {
    pub fn new(caller: Caller) -> Self {
        Self { caller }
    }

    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    pub fn account_id(&self) -> u64 {
        self.caller.account_id()
    }
}

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Ctx>()
            .copied()
            .ok_or_else(|| Error::Internal("Auth context missing".to_string()))
    }
}

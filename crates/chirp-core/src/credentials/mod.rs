//! Credential primitives
//!
//! Password hashing, short-lived token minting, renewal-token generation and
//! the trusted-caller key check, plus extraction of credentials from an
//! `Authorization` header value.

pub mod password;
pub mod renewal;
pub mod token;
pub mod trust;

pub use password::PasswordHasher;
pub use renewal::{generate_renewal_token, RenewalRegistry, RevokeOutcome};
pub use token::{clamp_ttl, Claims, TokenAuthority};
pub use trust::{TrustKeyVerifier, UPGRADE_EVENT};

use crate::error::{Error, Result};

pub const BEARER_SCHEME: &str = "Bearer ";
pub const API_KEY_SCHEME: &str = "ApiKey ";

fn extract_scheme<'a>(header: Option<&'a str>, scheme: &str) -> Result<&'a str> {
    let value = header.ok_or(Error::MissingCredential)?;
    let credential = value
        .strip_prefix(scheme)
        .map(str::trim)
        .ok_or(Error::MissingCredential)?;
    if credential.is_empty() {
        return Err(Error::MissingCredential);
    }
    Ok(credential)
}

/// Token after `Bearer ` in an `Authorization` header value.
pub fn extract_bearer(header: Option<&str>) -> Result<&str> {
    extract_scheme(header, BEARER_SCHEME)
}

/// Key after `ApiKey ` in an `Authorization` header value.
pub fn extract_api_key(header: Option<&str>) -> Result<&str> {
    extract_scheme(header, API_KEY_SCHEME)
}

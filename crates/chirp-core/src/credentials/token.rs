//! Short-lived signed identity tokens (HS256 JWT).

use crate::config::CoreConfig;
use crate::error::{Error, Result};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer stamped into every token and required on validation.
pub const TOKEN_ISSUER: &str = "chirp";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    /// Account id, decimal
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

/// Resolve a caller-requested lifetime against the server ceiling.
///
/// Zero or absent means "as long as allowed"; anything longer than the
/// ceiling is cut down to it.
pub fn clamp_ttl(requested_secs: Option<u64>, ceiling_secs: u64) -> u64 {
    match requested_secs {
        None | Some(0) => ceiling_secs,
        Some(secs) => secs.min(ceiling_secs),
    }
}

/// Mints and validates short-lived tokens with a server-held secret.
#[derive(Clone)]
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ceiling_secs: u64,
}

impl TokenAuthority {
    pub fn new(secret: &str, ceiling_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ceiling_secs,
        }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(&config.signing_secret, config.token_ttl_ceiling_secs)
    }

    pub fn ceiling_secs(&self) -> u64 {
        self.ceiling_secs
    }

    /// Mint a token for `subject_id`, clamping `ttl_secs` to the ceiling.
    pub fn mint(&self, subject_id: u64, ttl_secs: Option<u64>) -> Result<String> {
        let now = Utc::now().timestamp().max(0) as u64;
        self.mint_at(subject_id, ttl_secs, now)
    }

    pub(crate) fn mint_at(
        &self,
        subject_id: u64,
        ttl_secs: Option<u64>,
        issued_at: u64,
    ) -> Result<String> {
        let ttl = clamp_ttl(ttl_secs, self.ceiling_secs);
        let claims = Claims {
            iss: TOKEN_ISSUER.to_string(),
            sub: subject_id.to_string(),
            iat: issued_at,
            exp: issued_at + ttl,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| Error::Malformed)
    }

    /// Check signature, issuer and expiry, returning the decoded claims.
    pub fn validate_claims(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => Error::Expired,
                ErrorKind::InvalidSignature => Error::BadSignature,
                _ => Error::Malformed,
            })
    }

    /// Validate a token and return the account id it was minted for.
    pub fn validate(&self, token: &str) -> Result<u64> {
        let claims = self.validate_claims(token)?;
        claims.sub.parse().map_err(|_| Error::Malformed)
    }
}

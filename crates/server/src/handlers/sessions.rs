//! Login, refresh and revoke handlers

use crate::config::AppState;
use crate::error::{blocking, Error, Result};
use crate::middleware::authorization;
use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use chirp_core::RevokeOutcome;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub expires_in_seconds: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: u64,
    pub email: String,
    pub is_chirpy_red: bool,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(req) = payload?;
    info!("POST /api/login");

    let sessions = state.services.sessions.clone();
    let session = blocking(move || {
        sessions.login(&req.email, &req.password, req.expires_in_seconds)
    })
    .await?;

    Ok(Json(LoginResponse {
        id: session.account.id,
        email: session.account.email,
        is_chirpy_red: session.account.privileged,
        token: session.token,
        refresh_token: session.renewal_token,
    }))
}

/// POST /api/refresh
///
/// The bearer credential here is the renewal token, not a short-lived one.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>> {
    info!("POST /api/refresh");

    let renewal_token = chirp_core::extract_bearer(authorization(&headers))?.to_string();
    let sessions = state.services.sessions.clone();

    let token = blocking(move || sessions.refresh(&renewal_token))
        .await
        .map_err(|e| match e {
            // An unknown renewal token is a credential failure to the client
            Error::Core(chirp_core::Error::NotFound) => chirp_core::Error::Unauthorized.into(),
            e => e,
        })?;

    Ok(Json(TokenResponse { token }))
}

/// POST /api/revoke
pub async fn revoke(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode> {
    info!("POST /api/revoke");

    let renewal_token = chirp_core::extract_bearer(authorization(&headers))?.to_string();
    let sessions = state.services.sessions.clone();

    match blocking(move || sessions.revoke(&renewal_token)).await? {
        RevokeOutcome::Revoked => info!("Renewal token revoked"),
        RevokeOutcome::Unknown => debug!("Revoke for unknown renewal token"),
    }

    Ok(StatusCode::NO_CONTENT)
}

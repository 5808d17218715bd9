//! Billing webhook: the trusted upgrade pathway

use crate::config::AppState;
use crate::error::{blocking, Result};
use crate::middleware::authorization;
use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use chirp_core::UpgradeOutcome;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub user_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    pub data: WebhookData,
}

/// POST /api/polka/webhooks
pub async fn upgrade(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<WebhookRequest>, JsonRejection>,
) -> Result<StatusCode> {
    let Json(req) = payload?;
    info!("POST /api/polka/webhooks - {}", req.event);

    let key = chirp_core::extract_api_key(authorization(&headers))
        .map_err(|e| {
            warn!("Webhook without ApiKey credential");
            e
        })?
        .to_string();
    let sessions = state.services.sessions.clone();

    let outcome =
        blocking(move || sessions.upgrade(&key, &req.event, req.data.user_id)).await?;
    if outcome == UpgradeOutcome::Upgraded {
        info!("Webhook upgraded an account");
    }

    Ok(StatusCode::NO_CONTENT)
}

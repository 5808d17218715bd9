//! Account handlers

use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::{blocking, Result};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use chirp_core::AccountSummary;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: u64,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<AccountSummary> for AccountResponse {
    fn from(account: AccountSummary) -> Self {
        Self {
            id: account.id,
            email: account.email,
            is_chirpy_red: account.privileged,
        }
    }
}

/// POST /api/users
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountResponse>)> {
    let Json(req) = payload?;
    info!("POST /api/users");

    let sessions = state.services.sessions.clone();
    let account = blocking(move || sessions.register(&req.email, &req.password)).await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// PUT /api/users
pub async fn update(
    State(state): State<AppState>,
    ctx: Ctx,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<AccountResponse>> {
    let Json(req) = payload?;
    info!("PUT /api/users - account {}", ctx.account_id());

    let sessions = state.services.sessions.clone();
    let account = blocking(move || {
        sessions.update_account(ctx.caller(), &req.email, &req.password)
    })
    .await?;

    Ok(Json(account.into()))
}

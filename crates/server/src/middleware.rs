use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::Result;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::atomic::Ordering;
use tracing::{debug, warn};

/// Raw `Authorization` header value, if it is valid UTF-8.
pub fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
}

pub async fn mw_require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    debug!("MIDDLEWARE: require_auth");

    // Format: "Bearer <token>"
    let token = chirp_core::extract_bearer(authorization(req.headers()))?;

    let caller = state.services.records.authenticate(token).map_err(|e| {
        warn!("Rejected short-lived token: {}", e);
        e
    })?;

    req.extensions_mut().insert(Ctx::new(caller));

    Ok(next.run(req).await)
}

pub async fn mw_count_hits(State(state): State<AppState>, req: Request, next: Next) -> Response {
    state.file_server_hits.fetch_add(1, Ordering::Relaxed);
    next.run(req).await
}

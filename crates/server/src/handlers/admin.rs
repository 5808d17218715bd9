//! Health, metrics and reset

use crate::config::AppState;
use axum::{extract::State, response::Html};
use std::sync::atomic::Ordering;
use tracing::info;

/// GET /api/healthz
pub async fn healthz() -> &'static str {
    "OK"
}

/// GET /admin/metrics
pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    let hits = state.file_server_hits.load(Ordering::Relaxed);
    Html(format!(
        "<html>\n<body>\n<h1>Welcome, Chirpy Admin</h1>\n<p>Chirpy has been visited {} times!</p>\n</body>\n</html>\n",
        hits
    ))
}

/// POST /api/reset
pub async fn reset(State(state): State<AppState>) -> &'static str {
    info!("POST /api/reset");
    state.file_server_hits.store(0, Ordering::Relaxed);
    "Hits reset to 0"
}

//! Router
//!
//! Public routes, bearer-protected routes and the counted static file tree.

use crate::config::AppState;
use crate::handlers::{accounts, admin, posts, sessions, webhooks};
use crate::middleware::{mw_count_hits, mw_require_auth};
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::services::ServeDir;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/users", put(accounts::update))
        .route("/api/chirps", post(posts::create))
        .route("/api/chirps/{id}", delete(posts::delete))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            mw_require_auth,
        ));

    let files = Router::new()
        .nest_service("/app", ServeDir::new(&state.config.static_root))
        .layer(middleware::from_fn_with_state(state.clone(), mw_count_hits));

    Router::new()
        // Accounts and sessions
        .route("/api/users", post(accounts::register))
        .route("/api/login", post(sessions::login))
        .route("/api/refresh", post(sessions::refresh))
        .route("/api/revoke", post(sessions::revoke))
        // Posts
        .route("/api/chirps", get(posts::list))
        .route("/api/chirps/{id}", get(posts::get_one))
        // Trusted upgrade pathway
        .route("/api/polka/webhooks", post(webhooks::upgrade))
        // Admin
        .route("/api/healthz", get(admin::healthz))
        .route("/api/reset", post(admin::reset))
        .route("/admin/metrics", get(admin::metrics))
        .merge(protected)
        .merge(files)
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

//! Post handlers

use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::{blocking, Error, Result};
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chirp_core::{Post, PostQuery, SortOrder};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

impl ListParams {
    fn into_query(self) -> Result<PostQuery> {
        let author_id = match self.author_id.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(raw.parse().map_err(|_| {
                Error::BadRequest(format!("Invalid author_id: {}", raw))
            })?),
        };

        Ok(PostQuery {
            author_id,
            order: SortOrder::parse(self.sort.as_deref()),
        })
    }
}

/// POST /api/chirps
pub async fn create(
    State(state): State<AppState>,
    ctx: Ctx,
    payload: std::result::Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>)> {
    let Json(req) = payload?;
    info!("POST /api/chirps - account {}", ctx.account_id());

    let records = state.services.records.clone();
    let post = blocking(move || records.create_post(ctx.caller(), &req.body)).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/chirps?author_id=&sort=asc|desc
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Post>>> {
    info!("GET /api/chirps");

    let query = params.into_query()?;
    let records = state.services.records.clone();
    let posts = blocking(move || records.list_posts(query)).await?;

    Ok(Json(posts))
}

/// GET /api/chirps/{id}
pub async fn get_one(
    State(state): State<AppState>,
    path: std::result::Result<Path<u64>, PathRejection>,
) -> Result<Json<Post>> {
    let Path(id) = path?;
    info!("GET /api/chirps/{}", id);

    let records = state.services.records.clone();
    let post = blocking(move || records.get_post(id)).await?;

    Ok(Json(post))
}

/// DELETE /api/chirps/{id}
pub async fn delete(
    State(state): State<AppState>,
    ctx: Ctx,
    path: std::result::Result<Path<u64>, PathRejection>,
) -> Result<StatusCode> {
    let Path(id) = path?;
    info!("DELETE /api/chirps/{} - account {}", id, ctx.account_id());

    let records = state.services.records.clone();
    blocking(move || records.delete_post(ctx.caller(), id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

//! Catalog dashboard endpoints under `/api`.

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use clipforge_common::{CatalogStats, Error, VideoId, VideoRecord};
use serde::Deserialize;
use serde_json::json;

use super::error::AppError;
use super::AppContext;

pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/videos", get(list_videos))
        .route("/videos/:id", axum::routing::delete(delete_video))
        .route("/videos/:id/posted", patch(set_posted))
        .route("/stats", get(stats))
        .route("/export", get(export))
}

fn parse_id(raw: &str) -> Result<VideoId, AppError> {
    raw.parse()
        .map_err(|_| AppError::from(Error::not_found("video", raw)))
}

async fn list_videos(State(ctx): State<AppContext>) -> Result<Json<Vec<VideoRecord>>, AppError> {
    Ok(Json(ctx.store.load()?))
}

#[derive(Debug, Deserialize)]
struct PostedRequest {
    #[serde(default = "default_posted")]
    posted: bool,
}

fn default_posted() -> bool {
    true
}

/// An empty body marks the video as posted. Any other body must be a JSON
/// object; its content type is not checked.
fn posted_flag(body: &[u8]) -> Result<bool, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(true);
    }
    let req: PostedRequest = serde_json::from_slice(body)
        .map_err(|e| Error::validation(format!("invalid request body: {e}")))?;
    Ok(req.posted)
}

async fn set_posted(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let posted = posted_flag(&body)?;

    let video = ctx.store.set_posted(id, posted)?;
    tracing::info!(id = %id, posted, "Updated posted flag");

    Ok(Json(json!({ "success": true, "video": video })))
}

async fn delete_video(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Ok(id) = id.parse::<VideoId>() else {
        tracing::debug!(id = %id, "Delete with malformed id matched no record");
        return Ok(Json(json!({ "success": true })));
    };

    if ctx.store.delete(id)? {
        tracing::info!(id = %id, "Deleted video record");
    } else {
        tracing::debug!(id = %id, "Delete matched no record");
    }

    Ok(Json(json!({ "success": true })))
}

async fn stats(State(ctx): State<AppContext>) -> Result<Json<CatalogStats>, AppError> {
    let records = ctx.store.load()?;
    Ok(Json(CatalogStats::from_records(&records)))
}

/// Full collection, unfiltered, for backup or migration.
async fn export(State(ctx): State<AppContext>) -> Result<Json<Vec<VideoRecord>>, AppError> {
    Ok(Json(ctx.store.load()?))
}

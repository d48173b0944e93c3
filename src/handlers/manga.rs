use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::http::{header, Response, StatusCode};
use axum::Json;
use futures::StreamExt;
use hyper::Body;
use log::{error, info};

use crate::app_state::AppState;
use crate::models::errors::ApiError;
use crate::models::manga::MangaInfo;
use crate::store::MangaStore;

pub async fn get_latest_manga(
    State(state): State<AppState>,
) -> Result<Json<Vec<MangaInfo>>, ApiError> {
    let latest = state.store.latest_manga().await
        .map_err(|err| {
            error!("could not load latest manga: {}", err);
            ApiError::from(err)
        })?;

    Ok(Json(latest))
}

pub async fn get_manga_info(
    State(state): State<AppState>,
    Path(manga_id): Path<String>,
) -> Result<Json<MangaInfo>, ApiError> {
    manga_info(state.store.as_ref(), &manga_id).await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Manga not found"))
}

pub async fn get_chapter_images(
    State(state): State<AppState>,
    Path((manga_id, chapter_id)): Path<(String, String)>,
) -> Result<Response<Body>, ApiError> {
    let urls = state.store.chapter_image_urls(&manga_id, &chapter_id).await
        .map_err(|err| {
            error!("could not resolve pages of {}/{}: {}", manga_id, chapter_id, err);
            ApiError::from(err)
        })?;

    if urls.is_empty() {
        return Err(ApiError::not_found("Chapter not found"));
    }

    info!("{}/{}: streaming {} pages", manga_id, chapter_id, urls.len());
    let body = state.aggregator.stream(urls).map(Ok::<_, Infallible>);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::TRANSFER_ENCODING, "chunked")
        .body(Body::wrap_stream(body))
        .map_err(|err| ApiError::internal(err.to_string()))
}

/// Lookup failures count as a missing manga.
async fn manga_info(store: &dyn MangaStore, manga_id: &str) -> Option<MangaInfo> {
    match store.find_manga(manga_id).await {
        Ok(manga) => manga.map(MangaInfo::from),
        Err(err) => {
            error!("manga lookup failed for {}: {}", manga_id, err);
            None
        }
    }
}

use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use log::info;

use crate::app_state::AppState;
use crate::handlers::manga::{get_chapter_images, get_latest_manga, get_manga_info};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/getManga", get(get_latest_manga))
        .route("/getManga/", get(get_latest_manga))
        .route("/:manga_id", get(get_manga_info))
        .route("/:manga_id/", get(get_manga_info))
        .route("/:manga_id/:chapter_id", get(get_chapter_images))
        .route("/:manga_id/:chapter_id/", get(get_chapter_images))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request<B>(request: Request<B>, next: Next<B>) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    info!("{} {}: {}", method, path, response.status());

    response
}

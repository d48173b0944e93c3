use std::process;
use std::sync::Arc;

use log::{error, LevelFilter};

use crate::aggregator::ChapterAggregator;
use crate::app_state::AppState;
use crate::clients::image_client::ImageClient;
use crate::config::app_config::AppConfig;
use crate::store::file_store::FileMangaStore;

mod aggregator;
mod app_state;
mod clients;
mod config;
mod handlers;
mod models;
mod routes;
mod server;
mod store;

#[tokio::main]
async fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = AppConfig::new().unwrap_or_else(|err| {
        error!("could not load config: {}", err);
        process::exit(1)
    });

    let store = FileMangaStore::load(&config.catalog_path, config.latest_limit).unwrap_or_else(|err| {
        error!("could not load catalog: {}", err);
        process::exit(1)
    });

    let image_client = ImageClient::from_config(&config).unwrap_or_else(|err| {
        error!("could not build image client: {}", err);
        process::exit(1)
    });

    let state = AppState {
        store: Arc::new(store),
        aggregator: ChapterAggregator::new(Arc::new(image_client)),
    };

    if let Err(err) = server::start(&config, state).await {
        error!("server error: {}", err);
        process::exit(1)
    }
}

use std::sync::Arc;

use crate::aggregator::ChapterAggregator;
use crate::store::MangaStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MangaStore>,
    pub aggregator: ChapterAggregator,
}

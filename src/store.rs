use async_trait::async_trait;

use crate::models::errors::StoreError;
use crate::models::manga::{MangaInfo, MangaRecord};

pub mod file_store;

/// Read-only access to the manga catalog.
#[async_trait]
pub trait MangaStore: Send + Sync {
    async fn find_manga(&self, manga_id: &str) -> Result<Option<MangaRecord>, StoreError>;

    /// Ordered page URLs of one chapter. Empty when the manga or chapter is unknown.
    async fn chapter_image_urls(&self, manga_id: &str, chapter_id: &str) -> Result<Vec<String>, StoreError>;

    async fn latest_manga(&self) -> Result<Vec<MangaInfo>, StoreError>;
}

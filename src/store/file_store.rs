use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use log::info;
use serde_json::Value;

use crate::models::errors::StoreError;
use crate::models::manga::{MangaInfo, MangaRecord};
use crate::store::MangaStore;

/// Catalog loaded once from a JSON or YAML document and served from memory.
pub struct FileMangaStore {
    manga: Vec<MangaRecord>,
    latest_limit: usize,
}

impl FileMangaStore {
    pub fn new(manga: Vec<MangaRecord>, latest_limit: usize) -> Self {
        Self { manga, latest_limit }
    }

    pub fn load(path: &Path, latest_limit: usize) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path)
            .map_err(|err| StoreError { message: format!("{}: {}", path.display(), err) })?;

        let manga: Vec<MangaRecord> = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml") | Some("yaml") => serde_yaml::from_str(&content)
                .map_err(|err| StoreError { message: format!("{}: {}", path.display(), err) })?,
            _ => serde_json::from_str(&content)
                .map_err(|err| StoreError { message: format!("{}: {}", path.display(), err) })?,
        };

        info!("loaded {} manga from {}", manga.len(), path.display());
        Ok(Self::new(manga, latest_limit))
    }

    fn get(&self, manga_id: &str) -> Option<&MangaRecord> {
        self.manga.iter().find(|manga| manga.id == manga_id)
    }
}

#[async_trait]
impl MangaStore for FileMangaStore {
    async fn find_manga(&self, manga_id: &str) -> Result<Option<MangaRecord>, StoreError> {
        Ok(self.get(manga_id).cloned())
    }

    async fn chapter_image_urls(&self, manga_id: &str, chapter_id: &str) -> Result<Vec<String>, StoreError> {
        let urls = self.get(manga_id)
            .and_then(|manga| manga.chapter(chapter_id))
            .map(|chapter| chapter.image_urls.clone())
            .unwrap_or_default();

        Ok(urls)
    }

    async fn latest_manga(&self) -> Result<Vec<MangaInfo>, StoreError> {
        let mut latest: Vec<&MangaRecord> = self.manga.iter().collect();
        // stable sort, ties keep catalog order
        latest.sort_by(|a, b| newest_first(a.updated_at(), b.updated_at()));

        Ok(latest.into_iter()
            .take(self.latest_limit)
            .map(MangaInfo::from)
            .collect())
    }
}

fn newest_first(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_timestamps(b, a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ISO-8601 strings compare lexicographically, epoch values numerically.
fn compare_timestamps(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserializer;
use serde_derive::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A manga as kept by the store, page URLs included.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MangaRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub chapters: Vec<Chapter>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Chapter {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_urls: Vec<String>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

// Catalog exports carry `null` for chapterless manga and pageless chapters.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: serde::Deserialize<'de>,
{
    let list = <Option<Vec<T>> as serde::Deserialize>::deserialize(deserializer)?;
    Ok(list.unwrap_or_default())
}

/// Public view of a manga. Chapters keep their metadata but never their page URLs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MangaInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub chapters: Vec<ChapterInfo>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChapterInfo {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl MangaRecord {
    pub fn chapter(&self, chapter_id: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|chapter| chapter.id == chapter_id)
    }

    pub fn updated_at(&self) -> Option<&Value> {
        self.metadata.get("updatedAt")
    }
}

impl From<&Chapter> for ChapterInfo {
    fn from(chapter: &Chapter) -> Self {
        Self {
            id: chapter.id.clone(),
            metadata: chapter.metadata.clone(),
        }
    }
}

impl From<&MangaRecord> for MangaInfo {
    fn from(record: &MangaRecord) -> Self {
        Self {
            id: record.id.clone(),
            chapters: record.chapters.iter().map(ChapterInfo::from).collect(),
            metadata: record.metadata.clone(),
        }
    }
}

impl From<MangaRecord> for MangaInfo {
    fn from(record: MangaRecord) -> Self {
        Self {
            id: record.id,
            chapters: record.chapters.into_iter()
                .map(|chapter| ChapterInfo { id: chapter.id, metadata: chapter.metadata })
                .collect(),
            metadata: record.metadata,
        }
    }
}

/// One fetched page as it goes over the wire.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageImage {
    pub content_type: String,
    pub data: String,
}

impl PageImage {
    pub fn encode(content_type: String, bytes: &[u8]) -> Self {
        Self { content_type, data: STANDARD.encode(bytes) }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record() -> MangaRecord {
        serde_json::from_value(json!({
            "_id": "m1",
            "title": "Blue Lock",
            "author": "Muneyuki Kaneshiro",
            "chapters": [
                { "_id": "c1", "title": "Dream", "image_urls": ["u1", "u2"] },
                { "_id": "c2", "title": "Monster", "image_urls": ["u3"] }
            ]
        })).unwrap()
    }

    #[test]
    fn metadata_is_kept_outside_named_fields() {
        let record = record();
        assert_eq!(record.metadata.get("title"), Some(&json!("Blue Lock")));
        assert!(!record.metadata.contains_key("chapters"));
        assert_eq!(record.chapters[0].image_urls, vec!["u1", "u2"]);
        assert!(!record.chapters[0].metadata.contains_key("image_urls"));
    }

    #[test]
    fn null_lists_read_as_empty() {
        let records: Vec<MangaRecord> = serde_json::from_value(json!([
            { "_id": "m1", "chapters": null },
            { "_id": "m2", "chapters": [{ "_id": "c1", "image_urls": null }] }
        ])).unwrap();

        assert!(records[0].chapters.is_empty());
        assert!(records[1].chapters[0].image_urls.is_empty());
        assert!(!records[1].chapters[0].metadata.contains_key("image_urls"));
    }

    #[test]
    fn info_projection_drops_page_urls() {
        let info = MangaInfo::from(&record());
        let value = serde_json::to_value(&info).unwrap();

        assert_eq!(value["_id"], json!("m1"));
        assert_eq!(value["author"], json!("Muneyuki Kaneshiro"));
        let chapters = value["chapters"].as_array().unwrap();
        assert_eq!(chapters.len(), 2);
        for chapter in chapters {
            assert!(chapter.get("image_urls").is_none());
        }
        assert_eq!(chapters[1], json!({ "_id": "c2", "title": "Monster" }));
    }

    #[test]
    fn owned_and_borrowed_projections_agree() {
        let record = record();
        assert_eq!(MangaInfo::from(&record), MangaInfo::from(record));
    }

    #[test]
    fn chapter_lookup_by_id() {
        let record = record();
        assert_eq!(record.chapter("c2").map(|c| c.image_urls.len()), Some(1));
        assert!(record.chapter("c9").is_none());
    }

    #[test]
    fn page_image_serializes_camel_case_base64() {
        let page = PageImage::encode("image/png".to_string(), b"hello");
        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            json!({ "contentType": "image/png", "data": "aGVsbG8=" })
        );
    }
}

use std::sync::Arc;

use bytes::Bytes;
use futures::{future, stream, Stream, StreamExt};
use log::{error, warn};
use serde::Serialize;

use crate::clients::image_client::PageFetcher;

/// Incremental JSON array encoder. Remembers whether an element was already
/// written so separators only go between elements.
#[derive(Debug, Default)]
pub struct JsonArrayWriter {
    written: bool,
}

impl JsonArrayWriter {
    pub fn new() -> Self {
        Self { written: false }
    }

    pub fn open() -> Bytes {
        Bytes::from_static(b"[")
    }

    pub fn close() -> Bytes {
        Bytes::from_static(b"]")
    }

    pub fn element<T: Serialize>(&mut self, element: &T) -> Result<Bytes, serde_json::Error> {
        let json = serde_json::to_vec(element)?;
        let mut chunk = Vec::with_capacity(json.len() + 1);
        if self.written {
            chunk.push(b',');
        }
        chunk.extend_from_slice(&json);
        self.written = true;

        Ok(Bytes::from(chunk))
    }
}

/// Turns the page URLs of a chapter into a streamed JSON array of fetched pages.
#[derive(Clone)]
pub struct ChapterAggregator {
    fetcher: Arc<dyn PageFetcher>,
}

impl ChapterAggregator {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Pages are fetched one at a time, only as the consumer polls. Failed
    /// pages are logged and left out of the array.
    pub fn stream(&self, urls: Vec<String>) -> impl Stream<Item=Bytes> + Send + 'static {
        let fetcher = self.fetcher.clone();

        let pages = stream::iter(urls)
            .then(move |url| {
                let fetcher = fetcher.clone();
                async move {
                    match fetcher.fetch(&url).await {
                        Ok(page) => Some(page),
                        Err(err) => {
                            warn!("Failed to fetch image: {}: {}", url, err);
                            None
                        }
                    }
                }
            })
            .filter_map(future::ready);

        let elements = pages
            .scan(JsonArrayWriter::new(), |writer, page| {
                let chunk = match writer.element(&page) {
                    Ok(chunk) => Some(chunk),
                    Err(err) => {
                        error!("could not serialize page: {}", err);
                        None
                    }
                };
                future::ready(Some(chunk))
            })
            .filter_map(future::ready);

        stream::once(future::ready(JsonArrayWriter::open()))
            .chain(elements)
            .chain(stream::once(future::ready(JsonArrayWriter::close())))
    }
}

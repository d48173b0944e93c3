use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, REFERER, USER_AGENT};

use crate::config::app_config::AppConfig;
use crate::models::errors::FetchError;
use crate::models::manga::PageImage;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<PageImage, FetchError>;
}

/// Downloads page images from the upstream image host, posing as a browser coming from the reader site.
#[derive(Clone)]
pub struct ImageClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl ImageClient {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::with_browser_headers(&config.user_agent, &config.referer, config.image_timeout())
    }

    pub fn with_browser_headers(user_agent: &str, referer: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .default_headers(Self::browser_headers(user_agent, referer)?)
            .build()?;

        Ok(Self::new(client, timeout))
    }

    fn browser_headers(user_agent: &str, referer: &str) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, Self::header_value(user_agent)?);
        headers.insert(REFERER, Self::header_value(referer)?);
        Ok(headers)
    }

    fn header_value(value: &str) -> Result<HeaderValue, FetchError> {
        HeaderValue::from_str(value)
            .map_err(|err| FetchError { message: format!("invalid header value {:?}: {}", value, err) })
    }
}

#[async_trait]
impl PageFetcher for ImageClient {
    async fn fetch(&self, url: &str) -> Result<PageImage, FetchError> {
        let response = self.client.get(url)
            .timeout(self.timeout)
            .send().await?;

        debug!("GET {} {}", response.url(), response.status());
        let response = response.error_for_status()?;

        let content_type = response.headers().get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let bytes = response.bytes().await?;

        Ok(PageImage::encode(content_type, &bytes))
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use crate::config::app_config::{DEFAULT_REFERER, DEFAULT_USER_AGENT};

    use super::*;

    fn client(timeout_ms: u64) -> ImageClient {
        ImageClient::with_browser_headers(DEFAULT_USER_AGENT, DEFAULT_REFERER, Duration::from_millis(timeout_ms))
            .unwrap()
    }

    #[tokio::test]
    async fn fetch_sends_browser_headers_and_encodes_body() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(GET)
                .path("/chapter-1/1.png")
                .header("user-agent", DEFAULT_USER_AGENT)
                .header("referer", DEFAULT_REFERER);
            then.status(200)
                .header("content-type", "image/png")
                .body(b"\x89PNG");
        }).await;

        let page = client(1000).fetch(&server.url("/chapter-1/1.png")).await.unwrap();

        assert_eq!(page.content_type, "image/png");
        assert_eq!(page.data, "iVBORw==");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_content_type_falls_back_to_octet_stream() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/raw");
            then.status(200).body("abc");
        }).await;

        let page = client(1000).fetch(&server.url("/raw")).await.unwrap();
        assert_eq!(page.content_type, FALLBACK_CONTENT_TYPE);
        assert_eq!(page.data, "YWJj");
    }

    #[tokio::test]
    async fn error_status_is_a_failure() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/gone.jpg");
            then.status(404);
        }).await;

        assert!(client(1000).fetch(&server.url("/gone.jpg")).await.is_err());
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/slow.jpg");
            then.status(200)
                .header("content-type", "image/jpeg")
                .body("late")
                .delay(Duration::from_millis(500));
        }).await;

        assert!(client(100).fetch(&server.url("/slow.jpg")).await.is_err());
    }

    #[test]
    fn rejects_unprintable_header_values() {
        let client = ImageClient::with_browser_headers(DEFAULT_USER_AGENT, "bad\nvalue", Duration::from_secs(1));
        assert!(client.is_err());
    }
}

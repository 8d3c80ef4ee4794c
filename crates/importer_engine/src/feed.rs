use std::time::Duration;

use async_trait::async_trait;
use importer_core::CatalogRecord;
use serde::{Deserialize, Serialize};

use crate::types::FeedError;

/// Paginated external catalog feed.
#[async_trait]
pub trait CatalogFeed: Send + Sync {
    /// Fetches one page of records. An empty page signals the end of
    /// pagination.
    async fn fetch_page(&self, page_num: u64) -> Result<Vec<CatalogRecord>, FeedError>;
}

/// Connection settings for the catalog feed.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub url: String,
    pub api_key: String,
    pub bearer_token: String,
    pub language: String,
    pub page_size: u32,
    pub request_timeout: Duration,
}

/// `reqwest`-backed feed client.
#[derive(Debug, Clone)]
pub struct ReqwestCatalogFeed {
    client: reqwest::Client,
    settings: FeedSettings,
}

#[derive(Serialize)]
struct PageRequest<'a> {
    api_key: &'a str,
    language: &'a str,
    page_size: u32,
    page_num: u64,
    show_all_attributes: bool,
}

#[derive(Deserialize)]
struct PageResponse {
    /// Absent or empty means pagination has ended.
    #[serde(default)]
    products: Vec<CatalogRecord>,
}

impl ReqwestCatalogFeed {
    pub fn new(settings: FeedSettings) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FeedError::Request(err.to_string()))?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl CatalogFeed for ReqwestCatalogFeed {
    async fn fetch_page(&self, page_num: u64) -> Result<Vec<CatalogRecord>, FeedError> {
        let body = PageRequest {
            api_key: &self.settings.api_key,
            language: &self.settings.language,
            page_size: self.settings.page_size,
            page_num,
            show_all_attributes: true,
        };

        let response = self
            .client
            .post(&self.settings.url)
            .bearer_auth(&self.settings.bearer_token)
            .json(&body)
            .send()
            .await
            .map_err(|err| FeedError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::HttpStatus(status.as_u16()));
        }

        let page: PageResponse = response
            .json()
            .await
            .map_err(|err| FeedError::InvalidResponse(err.to_string()))?;
        Ok(page.products)
    }
}

use std::time::Duration;

use async_trait::async_trait;
use importer_core::{ProductPayload, StoreProduct};

use crate::types::{StoreError, StoreFailure};

/// Commerce store API surface used by the reconciliation engine.
#[async_trait]
pub trait StoreApi: Send + Sync {
    /// Looks a product up by SKU; `None` when the store has no match.
    async fn find_by_sku(&self, sku: &str) -> Result<Option<StoreProduct>, StoreError>;

    /// Creates a standalone product.
    async fn create_product(&self, payload: &ProductPayload) -> Result<(), StoreError>;

    /// Creates a variation under an existing parent product.
    async fn create_variation(
        &self,
        parent_id: u64,
        payload: &ProductPayload,
    ) -> Result<(), StoreError>;

    /// Updates an existing product.
    async fn update_product(&self, id: u64, payload: &ProductPayload) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: StoreApi + ?Sized> StoreApi for std::sync::Arc<S> {
    async fn find_by_sku(&self, sku: &str) -> Result<Option<StoreProduct>, StoreError> {
        (**self).find_by_sku(sku).await
    }

    async fn create_product(&self, payload: &ProductPayload) -> Result<(), StoreError> {
        (**self).create_product(payload).await
    }

    async fn create_variation(
        &self,
        parent_id: u64,
        payload: &ProductPayload,
    ) -> Result<(), StoreError> {
        (**self).create_variation(parent_id, payload).await
    }

    async fn update_product(&self, id: u64, payload: &ProductPayload) -> Result<(), StoreError> {
        (**self).update_product(id, payload).await
    }
}

/// Connection settings for the store API.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub request_timeout: Duration,
}

impl StoreSettings {
    pub fn new(
        base_url: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// `reqwest`-backed store client.
#[derive(Debug, Clone)]
pub struct ReqwestStoreApi {
    client: reqwest::Client,
    settings: StoreSettings,
}

impl ReqwestStoreApi {
    pub fn new(settings: StoreSettings) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| StoreError::new(StoreFailure::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.settings.base_url.trim_end_matches('/'))
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth(
            &self.settings.consumer_key,
            Some(&self.settings.consumer_secret),
        )
    }
}

#[async_trait]
impl StoreApi for ReqwestStoreApi {
    async fn find_by_sku(&self, sku: &str) -> Result<Option<StoreProduct>, StoreError> {
        let response = self
            .request(self.client.get(self.url("products")).query(&[("sku", sku)]))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response)?;
        let mut products: Vec<StoreProduct> = response
            .json()
            .await
            .map_err(|err| StoreError::new(StoreFailure::InvalidResponse, err.to_string()))?;
        // The lookup endpoint returns an array; an empty one means not found.
        if products.is_empty() {
            Ok(None)
        } else {
            Ok(Some(products.remove(0)))
        }
    }

    async fn create_product(&self, payload: &ProductPayload) -> Result<(), StoreError> {
        let response = self
            .request(self.client.post(self.url("products")).json(payload))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(response).map(|_| ())
    }

    async fn create_variation(
        &self,
        parent_id: u64,
        payload: &ProductPayload,
    ) -> Result<(), StoreError> {
        let url = self.url(&format!("products/{parent_id}/variations"));
        let response = self
            .request(self.client.post(url).json(payload))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(response).map(|_| ())
    }

    async fn update_product(&self, id: u64, payload: &ProductPayload) -> Result<(), StoreError> {
        let url = self.url(&format!("products/{id}"));
        let response = self
            .request(self.client.put(url).json(payload))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(response).map(|_| ())
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(StoreError::new(
            StoreFailure::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        return StoreError::new(StoreFailure::Timeout, err.to_string());
    }
    StoreError::new(StoreFailure::Network, err.to_string())
}

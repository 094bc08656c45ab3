//! HTTP storage client

use crate::config::StorageConfig;
use crate::error::{ConfigError, TransferResult};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;

use super::objects::{fetch_object, put_object};
use super::presigned::presigned_put_url;
use super::types::{ByteProgress, StorageTransport};

/// Client for the model storage endpoint.
#[derive(Debug, Clone)]
pub struct HttpStorage {
    pub(super) client: Client,
    pub(super) base_url: String,
}

impl HttpStorage {
    pub fn new(config: &StorageConfig) -> Result<Self, ConfigError> {
        reqwest::Url::parse(&config.base_url).map_err(|e| {
            ConfigError::Invalid(format!("Invalid storage base URL {}: {}", config.base_url, e))
        })?;

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::Invalid(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(super) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl StorageTransport for HttpStorage {
    async fn fetch(&self, url: &str, on_progress: &ByteProgress<'_>) -> TransferResult<Bytes> {
        fetch_object(&self.client, url, on_progress).await
    }

    async fn presign_upload(&self, file_name: &str, batch_id: &str) -> TransferResult<String> {
        presigned_put_url(self, file_name, batch_id).await
    }

    async fn put(&self, url: &str, body: Bytes) -> TransferResult<()> {
        put_object(&self.client, url, body).await
    }
}

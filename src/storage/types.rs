//! Storage collaborator types

use crate::error::{TransferError, TransferResult};
use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Byte-level progress sink: `(received_bytes, total_bytes_if_known)`.
pub type ByteProgress<'a> = dyn Fn(u64, Option<u64>) + Send + Sync + 'a;

/// The network capability the transfer pipeline runs on.
///
/// [`HttpStorage`](super::HttpStorage) talks to the real endpoint; tests substitute an
/// in-memory implementation.
#[async_trait]
pub trait StorageTransport: Send + Sync {
    /// Download the object behind `url`, reporting bytes as they arrive.
    async fn fetch(&self, url: &str, on_progress: &ByteProgress<'_>) -> TransferResult<Bytes>;

    /// Resolve the pre-signed destination for `file_name` inside upload batch `batch_id`.
    async fn presign_upload(&self, file_name: &str, batch_id: &str) -> TransferResult<String>;

    /// Store `body` at a pre-signed destination.
    async fn put(&self, url: &str, body: Bytes) -> TransferResult<()>;
}

/// `{"data": [...]}` envelope used by the listing endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    pub data: Vec<String>,
}

/// Presign endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct PresignedUrlResponse {
    pub url: String,
}

/// Check status and decode a JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    url: &str,
    response: reqwest::Response,
) -> TransferResult<T> {
    let response = check_status(url, response).await?;
    let text = response
        .text()
        .await
        .map_err(|e| TransferError::request(url, e))?;
    serde_json::from_str(&text).map_err(|source| TransferError::Decode {
        url: url.to_string(),
        source,
    })
}

pub(crate) async fn check_status(
    url: &str,
    response: reqwest::Response,
) -> TransferResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(TransferError::Status {
        url: url.to_string(),
        status,
        body,
    })
}

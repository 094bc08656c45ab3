//! Object transfer over pre-arranged URLs

use crate::error::{TransferError, TransferResult};
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use log::debug;
use reqwest::Client;

use super::types::{check_status, ByteProgress};

/// Upper bound on buffer preallocation; `Content-Length` is only a hint.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

/// Download an object into memory, reporting progress per received chunk.
pub(crate) async fn fetch_object(
    client: &Client,
    url: &str,
    on_progress: &ByteProgress<'_>,
) -> TransferResult<Bytes> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| TransferError::request(url, e))?;
    let response = check_status(url, response).await?;

    let total_bytes = response.content_length().filter(|len| *len > 0);
    let capacity = total_bytes.map_or(0, |len| len.min(MAX_PREALLOC));
    let mut buffer = BytesMut::with_capacity(capacity as usize);
    on_progress(0, total_bytes);

    let mut stream = response.bytes_stream();
    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| TransferError::request(url, e))?;
        buffer.extend_from_slice(&chunk);
        on_progress(buffer.len() as u64, total_bytes);
    }

    debug!("fetch_object: {} bytes from {}", buffer.len(), url);
    Ok(buffer.freeze())
}

/// Upload raw bytes to a pre-signed URL.
pub(crate) async fn put_object(client: &Client, url: &str, body: Bytes) -> TransferResult<()> {
    let size = body.len();
    let response = client
        .put(url)
        .header("Content-Type", "application/octet-stream")
        .body(body)
        .send()
        .await
        .map_err(|e| TransferError::request(url, e))?;
    check_status(url, response).await?;

    debug!("put_object: {} bytes to {}", size, url);
    Ok(())
}

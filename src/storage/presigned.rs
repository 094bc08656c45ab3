//! Pre-signed upload URL resolution

use crate::error::{TransferError, TransferResult};

use super::client::HttpStorage;
use super::types::{read_json, PresignedUrlResponse};

/// Ask the endpoint where `file_name` of upload batch `batch_id` should be PUT.
pub(crate) async fn presigned_put_url(
    storage: &HttpStorage,
    file_name: &str,
    batch_id: &str,
) -> TransferResult<String> {
    let url = storage.endpoint(&format!(
        "get-pre-signed-url?filename={}&folderName={}",
        urlencoding::encode(file_name),
        urlencoding::encode(batch_id)
    ));

    let response = storage
        .client
        .get(&url)
        .send()
        .await
        .map_err(|e| TransferError::request(&url, e))?;
    let presigned: PresignedUrlResponse = read_json(&url, response).await?;
    Ok(presigned.url)
}

//! Model catalog listing

use crate::error::{TransferError, TransferResult};
use log::info;

use super::client::HttpStorage;
use super::types::{read_json, ListResponse};

impl HttpStorage {
    /// Names of every uploaded model (batch) on the endpoint.
    pub async fn list_models(&self) -> TransferResult<Vec<String>> {
        let url = self.endpoint("get-dir");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransferError::request(&url, e))?;
        let listing: ListResponse = read_json(&url, response).await?;

        // The endpoint lists prefixes, e.g. "aB3xZ/".
        Ok(listing
            .data
            .into_iter()
            .map(|name| name.trim_end_matches('/').to_string())
            .filter(|name| !name.is_empty())
            .collect())
    }

    /// Download URLs for every file of `model`, in the order the endpoint lists them.
    pub async fn model_files(&self, model: &str) -> TransferResult<Vec<String>> {
        let url = self.endpoint(&format!("{}/get-files", urlencoding::encode(model)));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransferError::request(&url, e))?;
        let listing: ListResponse = read_json(&url, response).await?;
        info!("model_files: {} -> {} files", model, listing.data.len());
        Ok(listing.data)
    }
}

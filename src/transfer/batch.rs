//! Upload batch identifiers

use crate::error::{TransferError, TransferResult};
use serde::Serialize;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const BATCH_ID_LEN: usize = 5;

/// Largest multiple of the alphabet size that fits in a byte; bytes above it are redrawn.
const ACCEPT_BELOW: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// 5-character `[A-Za-z0-9]` folder name shared by every file of one upload job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BatchId(String);

impl BatchId {
    pub fn generate() -> TransferResult<Self> {
        let mut id = String::with_capacity(BATCH_ID_LEN);
        let mut buf = [0u8; 16];
        while id.len() < BATCH_ID_LEN {
            getrandom::getrandom(&mut buf)
                .map_err(|e| TransferError::Storage(format!("Failed to generate batch id: {}", e)))?;
            for byte in buf {
                if byte < ACCEPT_BELOW && id.len() < BATCH_ID_LEN {
                    id.push(ALPHABET[byte as usize % ALPHABET.len()] as char);
                }
            }
        }
        Ok(BatchId(id))
    }

    /// Wrap an existing identifier. Returns `None` unless it is 5 alphanumeric characters.
    pub fn parse(value: &str) -> Option<Self> {
        let valid = value.len() == BATCH_ID_LEN && value.bytes().all(|b| b.is_ascii_alphanumeric());
        valid.then(|| BatchId(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

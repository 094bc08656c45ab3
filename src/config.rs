//! Runtime configuration
//!
//! Every field has a default so a partial JSON document (or none at all) is enough.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum concurrent downloads per job
pub const DEFAULT_DOWNLOAD_CONCURRENCY: usize = 5;

/// Maximum concurrent uploads per job
pub const DEFAULT_UPLOAD_CONCURRENCY: usize = 7;

/// Interval between automatic `next()` calls while playing
pub const DEFAULT_CADENCE_MS: u64 = 1350;

pub const DEFAULT_MESH_SUFFIX: &str = ".production.ply";
pub const DEFAULT_MANDIBULAR_MARKER: &str = "Mandibular";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub storage: StorageConfig,
    pub transfer: TransferConfig,
    pub sequence: SequenceConfig,
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub base_url: String,
    /// Per-request timeout for the HTTP collaborator. `None` leaves requests unbounded.
    pub request_timeout_secs: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransferConfig {
    pub download_concurrency: usize,
    pub upload_concurrency: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            download_concurrency: DEFAULT_DOWNLOAD_CONCURRENCY,
            upload_concurrency: DEFAULT_UPLOAD_CONCURRENCY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SequenceConfig {
    pub mesh_suffix: String,
    /// Substring that puts a file in the mandibular stream. Every other mesh is maxillary.
    pub mandibular_marker: String,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            mesh_suffix: DEFAULT_MESH_SUFFIX.to_string(),
            mandibular_marker: DEFAULT_MANDIBULAR_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    pub cadence_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            cadence_ms: DEFAULT_CADENCE_MS,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        reqwest::Url::parse(&self.storage.base_url).map_err(|e| {
            ConfigError::Invalid(format!(
                "storage.base_url {:?} is not a valid URL: {}",
                self.storage.base_url, e
            ))
        })?;
        if self.transfer.download_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "transfer.download_concurrency must be at least 1".to_string(),
            ));
        }
        if self.transfer.upload_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "transfer.upload_concurrency must be at least 1".to_string(),
            ));
        }
        if self.sequence.mesh_suffix.is_empty() {
            return Err(ConfigError::Invalid(
                "sequence.mesh_suffix must not be empty".to_string(),
            ));
        }
        if self.sequence.mandibular_marker.is_empty() {
            return Err(ConfigError::Invalid(
                "sequence.mandibular_marker must not be empty".to_string(),
            ));
        }
        if self.playback.cadence_ms == 0 {
            return Err(ConfigError::Invalid(
                "playback.cadence_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = ViewerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.playback.cadence_ms, 1350);
        assert_eq!(config.sequence.mesh_suffix, ".production.ply");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = ViewerConfig::from_json_str(
            r#"{"transfer": {"download_concurrency": 2}, "storage": {"base_url": "https://scans.example.com"}}"#,
        )
        .unwrap();
        assert_eq!(config.transfer.download_concurrency, 2);
        assert_eq!(config.transfer.upload_concurrency, DEFAULT_UPLOAD_CONCURRENCY);
        assert_eq!(config.storage.base_url, "https://scans.example.com");
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = ViewerConfig::from_json_str(r#"{"transfer": {"upload_concurrency": 0}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let err = ViewerConfig::from_json_str(r#"{"storage": {"base_url": "not a url"}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("storage.base_url"));
    }

    #[test]
    fn empty_mandibular_marker_is_rejected() {
        let err = ViewerConfig::from_json_str(r#"{"sequence": {"mandibular_marker": ""}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("sequence.mandibular_marker"));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, r#"{"playback": {"cadence_ms": 500}}"#).unwrap();
        let config = ViewerConfig::load(&path).unwrap();
        assert_eq!(config.playback.cadence_ms, 500);

        let missing = ViewerConfig::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));
    }
}

//! Local export folder scanning

use crate::asset::{Asset, Classifier};
use crate::error::ScanError;
use log::debug;
use std::path::Path;
use walkdir::WalkDir;

/// Walk an export folder and load every mesh file as an [`Asset`].
///
/// The asset folder is the name of the file's immediate parent directory. Entries are
/// visited in file-name order so repeated scans of the same tree yield the same list.
pub fn scan_export_dir(root: &Path, classifier: &Classifier) -> Result<Vec<Asset>, ScanError> {
    let mut assets = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if !classifier.is_mesh(&name) {
            continue;
        }
        let folder = entry
            .path()
            .parent()
            .and_then(|p| p.file_name())
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_default();
        let data = std::fs::read(entry.path()).map_err(|source| ScanError::Read {
            path: entry.path().to_path_buf(),
            source,
        })?;
        assets.push(Asset::new(folder, name, data));
    }
    debug!("scan_export_dir: {} meshes under {}", assets.len(), root.display());
    Ok(assets)
}

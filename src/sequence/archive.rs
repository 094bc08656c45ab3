//! Zip packaging of an exported sequence

use crate::error::ExportError;
use bytes::Bytes;
use log::info;
use std::io::{Cursor, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::pair::SequencePair;

/// File name the packaged export is saved under.
pub const EXPORT_ARCHIVE_NAME: &str = "output.zip";

/// Write the pair's [`export_assets`](SequencePair::export_assets) into a zip, in upload order.
///
/// Entries are stored uncompressed; PLY payloads are mostly binary floats.
pub fn write_export_archive<W: Write + Seek>(
    pair: &SequencePair,
    writer: W,
) -> Result<W, ExportError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let mut zip = ZipWriter::new(writer);
    let assets = pair.export_assets();
    for asset in &assets {
        zip.start_file(asset.name(), options)?;
        zip.write_all(asset.data())?;
    }
    let writer = zip.finish()?;
    info!("export_archive: {} meshes", assets.len());
    Ok(writer)
}

/// In-memory variant of [`write_export_archive`].
pub fn export_archive(pair: &SequencePair) -> Result<Bytes, ExportError> {
    let cursor = write_export_archive(pair, Cursor::new(Vec::new()))?;
    Ok(Bytes::from(cursor.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Asset;
    use std::io::Read;
    use zip::ZipArchive;

    fn entries(archive: Bytes) -> Vec<(String, Vec<u8>)> {
        let mut zip = ZipArchive::new(Cursor::new(archive.to_vec())).unwrap();
        (0..zip.len())
            .map(|i| {
                let mut file = zip.by_index(i).unwrap();
                let mut data = Vec::new();
                file.read_to_end(&mut data).unwrap();
                (file.name().to_string(), data)
            })
            .collect()
    }

    #[test]
    fn archive_holds_renamed_meshes_in_upload_order() {
        let pair = SequencePair::new(
            vec![
                Asset::new("EXPORT_STEP1", "Maxillary.production.ply", b"upper-1".to_vec()),
                Asset::new("EXPORT", "Maxillary.production.ply", b"upper-final".to_vec()),
            ],
            vec![Asset::new("EXPORT_STEP1", "Mandibular.production.ply", b"lower-1".to_vec())],
        );

        let entries = entries(export_archive(&pair).unwrap());
        assert_eq!(
            entries,
            vec![
                ("Mandibular1.ply".to_string(), b"lower-1".to_vec()),
                ("Maxillary1.ply".to_string(), b"upper-1".to_vec()),
                ("Maxillary2.ply".to_string(), b"upper-final".to_vec()),
            ]
        );
    }

    #[test]
    fn empty_pair_gives_empty_archive() {
        let entries = entries(export_archive(&SequencePair::default()).unwrap());
        assert!(entries.is_empty());
    }
}

//! Step-ordered sequence model
//!
//! This module is organized into submodules:
//! - `ordering`: ordering keys parsed from export folder names
//! - `pair`: the index-aligned maxillary/mandibular sequence pair
//! - `sequencer`: grouping and classification of raw files
//! - `scan`: loading an export folder from disk
//! - `archive`: packaging the renamed meshes into a single zip

mod archive;
mod ordering;
mod pair;
mod scan;
mod sequencer;

pub use archive::{export_archive, write_export_archive, EXPORT_ARCHIVE_NAME};
pub use ordering::{sort_folder_names, OrderingKey};
pub use pair::SequencePair;
pub use scan::scan_export_dir;
pub use sequencer::Sequencer;

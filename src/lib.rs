//! Dental scan sequence viewer core.
//!
//! Uploads exported treatment-step meshes to a model storage endpoint, downloads them back,
//! orders them into index-aligned maxillary/mandibular streams and drives a renderer through
//! the steps.

pub mod asset;
pub mod config;
pub mod error;
pub mod playback;
pub mod sequence;
pub mod storage;
pub mod transfer;

pub use asset::{Arch, Asset, Classifier};
pub use config::ViewerConfig;
pub use error::{ConfigError, ExportError, ScanError, TransferError, TransferResult};
pub use playback::{PlaybackController, PlaybackState, Renderer, Visibility};
pub use sequence::{SequencePair, Sequencer};
pub use storage::{HttpStorage, StorageTransport};
pub use transfer::{JobOutcome, TransferCoordinator, TransferEvent, TransferHandle};

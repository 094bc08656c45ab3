//! Mesh assets and stream classification

use crate::config::SequenceConfig;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One of the two parallel mesh streams.
///
/// Stream A is the maxillary (upper) arch, stream B the mandibular (lower) arch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arch {
    #[serde(rename = "maxillary")]
    Maxillary,
    #[serde(rename = "mandibular")]
    Mandibular,
}

impl Arch {
    pub const ALL: [Arch; 2] = [Arch::Maxillary, Arch::Mandibular];
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arch::Maxillary => write!(f, "maxillary"),
            Arch::Mandibular => write!(f, "mandibular"),
        }
    }
}

/// A named, immutable binary blob and the folder it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    folder: String,
    name: String,
    data: Bytes,
}

impl Asset {
    pub fn new(folder: impl Into<String>, name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            folder: folder.into(),
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw bytes. Cloning the returned handle does not copy the payload.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Same payload and folder under a new file name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            folder: self.folder.clone(),
            name: name.into(),
            data: self.data.clone(),
        }
    }
}

/// Decides which files are meshes and which stream they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    mesh_suffix: String,
    mandibular_marker: String,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_config(&SequenceConfig::default())
    }
}

impl Classifier {
    pub fn from_config(config: &SequenceConfig) -> Self {
        Self {
            mesh_suffix: config.mesh_suffix.to_lowercase(),
            mandibular_marker: config.mandibular_marker.clone(),
        }
    }

    /// Case-insensitive suffix match against the mesh suffix.
    pub fn is_mesh(&self, name: &str) -> bool {
        name.to_lowercase().ends_with(&self.mesh_suffix)
    }

    /// Names carrying the mandibular marker go to stream B, everything else to stream A.
    pub fn classify(&self, name: &str) -> Arch {
        if name.contains(&self.mandibular_marker) {
            Arch::Mandibular
        } else {
            Arch::Maxillary
        }
    }

    /// Classify only if the name qualifies as a mesh file.
    pub fn classify_mesh(&self, name: &str) -> Option<Arch> {
        self.is_mesh(name).then(|| self.classify(name))
    }

    pub fn mandibular_marker(&self) -> &str {
        &self.mandibular_marker
    }
}

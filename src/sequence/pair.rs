use crate::asset::{Arch, Asset};

/// Two index-aligned mesh sequences. Index `i` in each stream is the same treatment step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequencePair {
    maxillary: Vec<Asset>,
    mandibular: Vec<Asset>,
}

impl SequencePair {
    pub fn new(maxillary: Vec<Asset>, mandibular: Vec<Asset>) -> Self {
        Self {
            maxillary,
            mandibular,
        }
    }

    pub fn push(&mut self, arch: Arch, asset: Asset) {
        match arch {
            Arch::Maxillary => self.maxillary.push(asset),
            Arch::Mandibular => self.mandibular.push(asset),
        }
    }

    pub fn stream(&self, arch: Arch) -> &[Asset] {
        match arch {
            Arch::Maxillary => &self.maxillary,
            Arch::Mandibular => &self.mandibular,
        }
    }

    pub fn maxillary(&self) -> &[Asset] {
        &self.maxillary
    }

    pub fn mandibular(&self) -> &[Asset] {
        &self.mandibular
    }

    pub fn get(&self, arch: Arch, index: usize) -> Option<&Asset> {
        self.stream(arch).get(index)
    }

    /// Number of steps: the longer of the two streams.
    pub fn step_count(&self) -> usize {
        self.maxillary.len().max(self.mandibular.len())
    }

    pub fn is_empty(&self) -> bool {
        self.maxillary.is_empty() && self.mandibular.is_empty()
    }

    /// Assets renamed for upload: `Mandibular<k>.ply` then `Maxillary<k>.ply`, 1-based.
    pub fn export_assets(&self) -> Vec<Asset> {
        let mut out = Vec::with_capacity(self.maxillary.len() + self.mandibular.len());
        for (i, asset) in self.mandibular.iter().enumerate() {
            out.push(asset.renamed(format!("Mandibular{}.ply", i + 1)));
        }
        for (i, asset) in self.maxillary.iter().enumerate() {
            out.push(asset.renamed(format!("Maxillary{}.ply", i + 1)));
        }
        out
    }
}
